//! Domain-specific configuration modules

pub mod control_api;
pub mod logging;
pub mod orchestration;
pub mod retry;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use swarmpilot_resilience::RetryPolicy;

/// Main SwarmPilot configuration combining all domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SwarmPilotConfig {
    /// Scenario source, target host and time compression
    #[serde(default)]
    pub orchestration: orchestration::OrchestrationConfig,

    /// Load generator web API
    #[serde(default)]
    pub control_api: control_api::ControlApiConfig,

    /// Retry policy for control API calls
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl SwarmPilotConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.orchestration.validate()?;
        self.control_api.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = SwarmPilotConfig::default();
        config.orchestration.scenario_source = Some("scenarios/1h_spike.json".to_string());
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
