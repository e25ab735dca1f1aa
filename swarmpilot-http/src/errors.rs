//! Control API error types

use std::time::Duration;
use swarmpilot_resilience::Retryable;

pub type HttpResult<T> = Result<T, ControlApiError>;

/// Failure of a control API call
///
/// Transient failures (network trouble, 5xx, 429) may succeed on retry.
/// Permanent ones (other 4xx, a refused command, an unreadable reply) will not.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlApiError {
    #[error("{operation} failed transiently: {message}")]
    Transient {
        operation: &'static str,
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("{operation} failed: {message}")]
    Permanent {
        operation: &'static str,
        message: String,
    },
}

impl ControlApiError {
    pub fn transient(operation: &'static str, message: impl Into<String>) -> Self {
        ControlApiError::Transient {
            operation,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn permanent(operation: &'static str, message: impl Into<String>) -> Self {
        ControlApiError::Permanent {
            operation,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ControlApiError::Transient { .. })
    }

    pub fn operation(&self) -> &'static str {
        match self {
            ControlApiError::Transient { operation, .. }
            | ControlApiError::Permanent { operation, .. } => operation,
        }
    }

    /// Classify a transport-level failure
    pub fn from_reqwest(operation: &'static str, error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::from_status(operation, status, error.to_string(), None);
        }
        if error.is_timeout() || error.is_connect() || error.is_request() {
            Self::transient(operation, error.to_string())
        } else {
            Self::permanent(operation, error.to_string())
        }
    }

    /// Classify an unsuccessful HTTP status
    pub fn from_status(
        operation: &'static str,
        status: reqwest::StatusCode,
        body: impl Into<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body.trim())
        };

        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ControlApiError::Transient {
                operation,
                message,
                retry_after,
            }
        } else {
            ControlApiError::Permanent { operation, message }
        }
    }
}

impl Retryable for ControlApiError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }

    fn retry_delay(&self) -> Option<Duration> {
        match self {
            ControlApiError::Transient { retry_after, .. } => *retry_after,
            ControlApiError::Permanent { .. } => None,
        }
    }
}
