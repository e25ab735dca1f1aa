//! Runtime error types

use std::path::PathBuf;
use swarmpilot_core::ValidationError;
use swarmpilot_http::ControlApiError;
use thiserror::Error;

/// Why an orchestration run ended without completing
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// A control call failed permanently or ran out of retries.
    /// `phase_index` is `None` for the closing stop.
    #[error("{}control API failed after {attempts} attempt(s): {source}", phase_prefix(.phase_index))]
    ControlApi {
        phase_index: Option<usize>,
        attempts: u32,
        #[source]
        source: ControlApiError,
    },

    #[error("scheduler invariant violated: {0}")]
    InvariantViolation(String),

    #[error("run cancelled ({})", if *.final_stop_ok { "load generator stopped" } else { "final stop failed" })]
    Cancelled { final_stop_ok: bool },
}

fn phase_prefix(phase_index: &Option<usize>) -> String {
    match phase_index {
        Some(index) => format!("phase {}: ", index),
        None => String::new(),
    }
}

/// Failure to obtain a scenario document
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read scenario file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch scenario from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
