//! Orchestration loop configuration

use crate::error::ConfigResult;
use crate::validation::{
    is_remote_source, validate_http_url, validate_positive, validate_required_string, Validatable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One real year per simulated day
pub const MAX_REAL_HOURS_PER_SIMULATED_DAY: f64 = 8760.0;

/// What to run, against which host, and how time is compressed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Scenario file path or http(s) URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_source: Option<String>,

    /// Host the load generator sends traffic to
    #[serde(default = "default_target_host")]
    pub target_host: String,

    /// Interval between scheduler ticks, in seconds
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_tick_interval"
    )]
    pub tick_interval: Duration,

    /// Real hours standing in for one simulated day
    #[serde(default = "default_hours_per_day")]
    pub real_hours_per_simulated_day: f64,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            scenario_source: None,
            target_host: default_target_host(),
            tick_interval: default_tick_interval(),
            real_hours_per_simulated_day: default_hours_per_day(),
        }
    }
}

impl OrchestrationConfig {
    /// Real-time length of one simulated day
    pub fn day_length(&self) -> Duration {
        Duration::try_from_secs_f64(self.real_hours_per_simulated_day * 3600.0)
            .unwrap_or(Duration::ZERO)
    }
}

impl Validatable for OrchestrationConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.target_host, "target_host", self.domain_name())?;
        validate_positive(self.tick_interval.as_secs(), "tick_interval", self.domain_name())?;

        if !self.real_hours_per_simulated_day.is_finite() {
            return Err(self.validation_error("real_hours_per_simulated_day must be finite"));
        }
        validate_positive(
            self.real_hours_per_simulated_day,
            "real_hours_per_simulated_day",
            self.domain_name(),
        )?;
        if self.real_hours_per_simulated_day > MAX_REAL_HOURS_PER_SIMULATED_DAY {
            return Err(self.validation_error(format!(
                "real_hours_per_simulated_day must be at most {}",
                MAX_REAL_HOURS_PER_SIMULATED_DAY
            )));
        }

        if let Some(source) = &self.scenario_source {
            validate_required_string(source, "scenario_source", self.domain_name())?;
            if is_remote_source(source) {
                validate_http_url(source, "scenario_source", self.domain_name())?;
            }
        }

        if self.tick_interval > self.day_length() {
            log::warn!(
                "tick_interval ({}s) is longer than a simulated day; day windows will be observed late",
                self.tick_interval.as_secs()
            );
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "orchestration"
    }
}

fn default_target_host() -> String {
    "http://frontend:80".to_string()
}

fn default_tick_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_hours_per_day() -> f64 {
    3.0
}
