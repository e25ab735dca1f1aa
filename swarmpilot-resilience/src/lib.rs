//! Resilience patterns for SwarmPilot
//!
//! Retry policies with bounded backoff for control-API calls, and the
//! cooperative cancellation signal the orchestration loop checks between
//! ticks.

pub mod backoff;
pub mod cancel;
pub mod retry;

// Re-export commonly used types
pub use backoff::{BackoffCalculator, BackoffStrategy};
pub use cancel::{cancel_on_process_signals, cancellation, CancelHandle, CancelSignal};
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
