//! Runtime components for SwarmPilot
//!
//! [`SwarmController`] turns the active schedule entry into control API
//! calls; [`OrchestrationLoop`] ticks the scheduler and the controller until
//! the scenario completes or the run is cancelled.

pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod source;

// Re-export commonly used types
pub use controller::{ControllerState, ControllerStatus, SwarmController};
pub use error::{OrchestrationError, SourceError};
pub use orchestrator::{OrchestrationLoop, RunSummary, DEFAULT_TICK_INTERVAL};
pub use source::load_scenario;
