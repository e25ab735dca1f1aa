//! LocustClient against a mock Locust master

use serde_json::json;
use std::time::Duration;
use swarmpilot_http::{ControlApi, ControlApiError, HttpConfig, LocustClient, SwarmStatus};
use swarmpilot_resilience::Retryable;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LocustClient {
    LocustClient::new(HttpConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(1),
        ..HttpConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_start_posts_swarm_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/swarm"))
        .and(body_string_contains("user_count=50"))
        .and(body_string_contains("spawn_rate=10"))
        .and(body_string_contains("host=http%3A%2F%2Ffrontend%3A80"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Swarming started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .start_or_update(50, 10.0, "http://frontend:80")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stop_uses_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Test stopped"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).stop().await.unwrap();
}

#[tokio::test]
async fn test_status_reads_runner_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stats/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "spawning",
            "user_count": 17,
            "stats": [],
            "errors": []
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).status().await.unwrap();
    assert_eq!(
        status,
        SwarmStatus {
            active: true,
            current_users: 17
        }
    );
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "2"))
        .mount(&server)
        .await;

    let err = client_for(&server).stop().await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.retry_delay(), Some(Duration::from_secs(2)));
    assert_eq!(err.operation(), "stop");
}

#[tokio::test]
async fn test_client_error_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/swarm"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad spawn_rate"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .start_or_update(5, 1.0, "http://frontend:80")
        .await
        .unwrap_err();
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("bad spawn_rate"));
}

#[tokio::test]
async fn test_refused_command_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/swarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Shape test running"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .start_or_update(5, 1.0, "http://frontend:80")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ControlApiError::permanent("swarm", "Shape test running")
    );
}

#[tokio::test]
async fn test_unreadable_reply_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).stop().await.unwrap_err();
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = LocustClient::new(HttpConfig {
        base_url: format!("http://127.0.0.1:{}", port),
        ..HttpConfig::default()
    })
    .unwrap();

    let err = client.stop().await.unwrap_err();
    assert!(err.is_transient(), "{}", err);
}
