//! Core error types for SwarmPilot

use thiserror::Error;

/// A scenario document was rejected
///
/// `phase_index` is `None` when the problem concerns the document as a whole
/// (wrong encoding, not an array, empty).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_validation(.reason, .phase_index))]
pub struct ValidationError {
    pub reason: String,
    pub phase_index: Option<usize>,
}

impl ValidationError {
    pub fn document(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            phase_index: None,
        }
    }

    pub fn phase(phase_index: usize, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            phase_index: Some(phase_index),
        }
    }
}

fn render_validation(reason: &str, phase_index: &Option<usize>) -> String {
    match phase_index {
        Some(index) => format!("invalid scenario: phase {}: {}", index, reason),
        None => format!("invalid scenario: {}", reason),
    }
}

/// Simulated days are 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid simulated day {day}: days start at 1")]
pub struct InvalidDayError {
    pub day: u32,
}

/// Scenario generator errors
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("step durations must sum to 24 hours, got {0}")]
    DurationsNotOneDay(u32),

    #[error("average table has {columns} columns but {steps} step durations")]
    ShapeMismatch { columns: usize, steps: usize },

    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to serialize scenario: {0}")]
    Serialization(#[from] serde_json::Error),
}
