//! Domain-driven configuration for SwarmPilot
//!
//! Configuration is split by functional domain (orchestration, control API,
//! retry, logging). Each domain has defaults, validation and environment
//! variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    control_api::ControlApiConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    orchestration::OrchestrationConfig,
    SwarmPilotConfig,
};
pub use swarmpilot_resilience::RetryPolicy;

// Re-export utilities
pub use domains::utils::serde_duration;
