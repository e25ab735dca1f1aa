//! Core domain of SwarmPilot
//!
//! A [`Scenario`] is an ordered list of load [`Phase`]s. The
//! [`PhaseScheduler`] walks it against elapsed real time, using the
//! [`SimulatedClock`] to map simulated days onto compressed real-time
//! windows, and reports which phase should be driving the load generator.
//! Nothing here performs I/O; the runtime crate turns scheduler output into
//! control-API calls.

pub mod clock;
pub mod error;
pub mod generator;
pub mod scenario;
pub mod scheduler;

// Re-export main types
pub use clock::{elapsed, SimulatedClock, DEFAULT_REAL_HOURS_PER_SIMULATED_DAY};
pub use error::{GeneratorError, InvalidDayError, ValidationError};
pub use scenario::{Phase, Scenario};
pub use scheduler::{plan, PhaseScheduler, ScheduleEntry, SchedulerEvent, SchedulerState};
