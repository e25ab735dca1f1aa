//! Load-generator control API for SwarmPilot
//!
//! [`ControlApi`] is the seam between orchestration and the load engine.
//! [`LocustClient`] implements it against a Locust master's web API.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{ControlApi, LocustClient};
pub use config::HttpConfig;
pub use errors::{ControlApiError, HttpResult};
pub use types::{StatsReply, SwarmReply, SwarmStatus};
