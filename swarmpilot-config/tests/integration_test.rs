//! Integration tests for swarmpilot-config

use std::io::Write;
use std::time::Duration;
use swarmpilot_config::*;
use swarmpilot_resilience::BackoffStrategy;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = SwarmPilotConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("SWARMPILOT_SCENARIO_SOURCE", Some("scenarios/7days.json")),
        ("SWARMPILOT_TARGET_HOST", Some("http://petclinic:8080")),
        ("SWARMPILOT_TICK_INTERVAL", Some("10")),
        ("SWARMPILOT_HOURS_PER_DAY", Some("0.25")),
        ("SWARMPILOT_CONTROL_URL", Some("http://locust-master:8089")),
        ("SWARMPILOT_HTTP_TIMEOUT", Some("60")),
        ("SWARMPILOT_RETRY_MAX_ATTEMPTS", Some("7")),
        ("SWARMPILOT_LOG_LEVEL", Some("debug")),
        ("SWARMPILOT_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(
            config.orchestration.scenario_source.as_deref(),
            Some("scenarios/7days.json")
        );
        assert_eq!(config.orchestration.target_host, "http://petclinic:8080");
        assert_eq!(config.orchestration.tick_interval, Duration::from_secs(10));
        assert_eq!(config.orchestration.day_length(), Duration::from_secs(900));
        assert_eq!(config.control_api.base_url, "http://locust-master:8089");
        assert_eq!(config.control_api.timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_attempts, 7);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("SWARMPILOT_TICK_INTERVAL", Some("soon"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(msg) if msg.contains("TICK_INTERVAL")));
    });
}

#[test]
fn test_env_override_is_validated() {
    with_vars(vec![("SWARMPILOT_RETRY_MAX_ATTEMPTS", Some("0"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "retry"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADTEST_TARGET_HOST", Some("http://shop:80"))], || {
        let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
        assert_eq!(config.orchestration.target_host, "http://shop:80");
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = SwarmPilotConfig::generate_sample();

    // Parse it back
    let parsed: SwarmPilotConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(
        parsed.orchestration.scenario_source.as_deref(),
        Some("scenarios/1h_spike.json")
    );
    assert_eq!(parsed.retry, RetryPolicy::default());
}

#[test]
fn test_comprehensive_config_file() {
    let yaml = r#"
orchestration:
  scenario_source: https://configs.example.com/scenario.json
  target_host: http://frontend.microservices-demo:80
  tick_interval: 15
  real_hours_per_simulated_day: 1.5

control_api:
  base_url: http://locust-master.loadgenerator:8089
  timeout: 20
  connect_timeout: 3
  confirm_with_status: true

retry:
  max_attempts: 5
  initial_delay: 250ms
  max_delay: 4s
  backoff:
    type: exponential
    base: 3.0
  jitter: false

logging:
  level: warn
  format: compact
  directives:
    - reqwest=error
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let config = ConfigLoader::new().from_file(file.path()).unwrap();

        assert_eq!(config.orchestration.tick_interval, Duration::from_secs(15));
        assert_eq!(config.orchestration.day_length(), Duration::from_secs(5400));
        assert!(config.control_api.confirm_with_status);
        assert_eq!(config.control_api.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(250));
        assert_eq!(config.retry.backoff, BackoffStrategy::Exponential { base: 3.0 });
        assert!(!config.retry.jitter);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.directives, vec!["reqwest=error".to_string()]);
    });
}

#[test]
fn test_env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"orchestration:\n  tick_interval: 30\n").unwrap();

    with_vars(vec![("SWARMPILOT_TICK_INTERVAL", Some("2"))], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();
        assert_eq!(config.orchestration.tick_interval, Duration::from_secs(2));
    });
}

#[test]
fn test_partial_and_empty_files_use_defaults() {
    let empty = tempfile::NamedTempFile::new().unwrap();
    let mut partial = tempfile::NamedTempFile::new().unwrap();
    partial.write_all(b"logging:\n  level: trace\n").unwrap();

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let loader = ConfigLoader::new();

        let config = loader.from_file(empty.path()).unwrap();
        assert_eq!(config, SwarmPilotConfig::default());

        let config = loader.from_file(partial.path()).unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.control_api, ControlApiConfig::default());
    });
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"control_api:\n  base_url: not-a-url\n").unwrap();

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let err = ConfigLoader::new().from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "control_api"));
    });
}

#[test]
fn test_missing_file() {
    let err = ConfigLoader::new()
        .from_file("/nonexistent/swarmpilot.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}
