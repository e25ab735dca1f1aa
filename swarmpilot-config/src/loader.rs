//! Configuration loading and environment variable handling

use crate::domains::control_api::ControlApiConfig;
use crate::domains::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::domains::orchestration::OrchestrationConfig;
use crate::domains::SwarmPilotConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use swarmpilot_resilience::RetryPolicy;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "SWARMPILOT".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SwarmPilotConfig> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut config: SwarmPilotConfig = if content.trim().is_empty() {
            SwarmPilotConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SwarmPilotConfig> {
        let mut config = SwarmPilotConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SwarmPilotConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut SwarmPilotConfig) -> ConfigResult<()> {
        self.apply_orchestration_overrides(&mut config.orchestration)?;
        self.apply_control_api_overrides(&mut config.control_api)?;
        self.apply_retry_overrides(&mut config.retry)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply orchestration config overrides
    fn apply_orchestration_overrides(&self, config: &mut OrchestrationConfig) -> ConfigResult<()> {
        if let Ok(source) = self.get_env_var("SCENARIO_SOURCE") {
            config.scenario_source = Some(source);
        }

        if let Ok(host) = self.get_env_var("TARGET_HOST") {
            config.target_host = host;
        }

        if let Ok(tick) = self.get_env_var("TICK_INTERVAL") {
            config.tick_interval = self.parse_seconds("TICK_INTERVAL", &tick)?;
        }

        if let Ok(hours) = self.get_env_var("HOURS_PER_DAY") {
            config.real_hours_per_simulated_day = hours
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HOURS_PER_DAY: {}", e)))?;
        }

        Ok(())
    }

    /// Apply control API config overrides
    fn apply_control_api_overrides(&self, config: &mut ControlApiConfig) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("CONTROL_URL") {
            config.base_url = url;
        }

        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            config.timeout = self.parse_seconds("HTTP_TIMEOUT", &timeout)?;
        }

        Ok(())
    }

    /// Apply retry policy overrides
    fn apply_retry_overrides(&self, policy: &mut RetryPolicy) -> ConfigResult<()> {
        if let Ok(attempts) = self.get_env_var("RETRY_MAX_ATTEMPTS") {
            policy.max_attempts = attempts.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid RETRY_MAX_ATTEMPTS: {}", e))
            })?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(&self, config: &mut LoggingConfig) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn parse_seconds(&self, name: &str, value: &str) -> ConfigResult<Duration> {
        let seconds: u64 = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))?;
        Ok(Duration::from_secs(seconds))
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
