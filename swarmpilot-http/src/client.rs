//! Control API client implementation

use crate::config::HttpConfig;
use crate::errors::{ControlApiError, HttpResult};
use crate::types::{StatsReply, SwarmReply, SwarmStatus};
use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Control surface of a load-generation engine
///
/// Implementations must not retry internally; callers wrap calls in a
/// retry executor and rely on [`ControlApiError`]'s classification.
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// Start the swarm, or move a running swarm to a new target
    async fn start_or_update(
        &self,
        target_users: u32,
        spawn_rate: f64,
        target_host: &str,
    ) -> HttpResult<()>;

    async fn stop(&self) -> HttpResult<()>;

    async fn status(&self) -> HttpResult<SwarmStatus>;
}

#[async_trait]
impl<T: ControlApi + ?Sized> ControlApi for Arc<T> {
    async fn start_or_update(
        &self,
        target_users: u32,
        spawn_rate: f64,
        target_host: &str,
    ) -> HttpResult<()> {
        (**self)
            .start_or_update(target_users, spawn_rate, target_host)
            .await
    }

    async fn stop(&self) -> HttpResult<()> {
        (**self).stop().await
    }

    async fn status(&self) -> HttpResult<SwarmStatus> {
        (**self).status().await
    }
}

/// [`ControlApi`] over a Locust master's web API
#[derive(Debug, Clone)]
pub struct LocustClient {
    client: Client,
    base_url: Url,
}

impl LocustClient {
    pub fn new(config: HttpConfig) -> HttpResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        debug!(
            "Creating Locust client for {} with {}s timeout",
            base_url,
            config.timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ControlApiError::permanent("client setup", e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, operation: &'static str, path: &str) -> HttpResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ControlApiError::permanent(operation, format!("invalid endpoint: {}", e)))
    }

    async fn command(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> HttpResult<SwarmReply> {
        let response = request
            .send()
            .await
            .map_err(|e| ControlApiError::from_reqwest(operation, e))?;
        let response = ensure_success(operation, response).await?;

        let reply: SwarmReply = response.json().await.map_err(|e| {
            ControlApiError::permanent(operation, format!("unreadable reply: {}", e))
        })?;

        if !reply.success {
            let message = if reply.message.is_empty() {
                "load generator refused the command".to_string()
            } else {
                reply.message
            };
            return Err(ControlApiError::permanent(operation, message));
        }

        Ok(reply)
    }
}

#[async_trait]
impl ControlApi for LocustClient {
    async fn start_or_update(
        &self,
        target_users: u32,
        spawn_rate: f64,
        target_host: &str,
    ) -> HttpResult<()> {
        const OPERATION: &str = "swarm";

        let url = self.endpoint(OPERATION, "swarm")?;
        let form = [
            ("user_count", target_users.to_string()),
            ("spawn_rate", spawn_rate.to_string()),
            ("host", target_host.to_string()),
        ];

        let reply = self
            .command(OPERATION, self.client.post(url).form(&form))
            .await?;
        info!(
            target_users,
            spawn_rate, target_host, "Swarm target applied: {}", reply.message
        );
        Ok(())
    }

    async fn stop(&self) -> HttpResult<()> {
        const OPERATION: &str = "stop";

        let url = self.endpoint(OPERATION, "stop")?;
        let reply = self.command(OPERATION, self.client.get(url)).await?;
        info!("Swarm stopped: {}", reply.message);
        Ok(())
    }

    async fn status(&self) -> HttpResult<SwarmStatus> {
        const OPERATION: &str = "status";

        let url = self.endpoint(OPERATION, "stats/requests")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ControlApiError::from_reqwest(OPERATION, e))?;
        let response = ensure_success(OPERATION, response).await?;

        let stats: StatsReply = response.json().await.map_err(|e| {
            ControlApiError::permanent(OPERATION, format!("unreadable stats: {}", e))
        })?;
        debug!("Load generator state: {} with {} users", stats.state, stats.user_count);

        Ok(stats.into())
    }
}

/// Parse the base URL so relative endpoints land under its path
fn parse_base_url(base: &str) -> HttpResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ControlApiError::permanent("client setup", format!("invalid base URL: {}", e)))?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn ensure_success(operation: &'static str, response: Response) -> HttpResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();

    Err(ControlApiError::from_status(operation, status, body, retry_after))
}
