//! Logging setup for SwarmPilot
//!
//! Library crates emit through `tracing` (or `log`, which is bridged). The
//! binary calls [`init_logging_from_config`] once at startup.

pub mod init;

// Re-export main types for convenience
pub use init::{filter_directives, init_logging_from_config, init_simple_tracing};
pub use swarmpilot_config::{LogFormat, LogLevel, LoggingConfig};
