//! Retry policy and executor

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::backoff::{BackoffCalculator, BackoffStrategy};

/// Bounded retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,

    /// Upper bound on any single delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,

    /// Growth of the delay between attempts
    pub backoff: BackoffStrategy,

    /// Whether to add jitter to retry delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff: BackoffStrategy::Exponential { base: 2.0 },
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Exponential doubling without jitter, handy where delays must be predictable
    pub fn exponential(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            backoff: BackoffStrategy::Exponential { base: 2.0 },
            jitter: false,
        }
    }

    /// Calculate delay for a specific attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        BackoffCalculator::new(
            self.backoff.clone(),
            self.initial_delay,
            self.max_delay,
            self.jitter,
        )
        .calculate_delay(attempt)
    }
}

/// Trait for errors that can be retried
pub trait Retryable {
    /// Whether another attempt may succeed
    fn is_retryable(&self) -> bool;

    /// Server-provided delay hint overriding the policy
    fn retry_delay(&self) -> Option<Duration> {
        None
    }
}

/// Runs an async operation until it succeeds, fails permanently, or the
/// policy's attempts run out. Attempts run strictly one after another.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self::new(RetryPolicy::default())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a function with retry logic
    pub async fn execute<F, Fut, T, E>(&self, operation: &str, mut f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        self.execute_with_context(operation, |_attempt| f()).await
    }

    /// Execute a function with retry logic, passing the 1-indexed attempt
    pub async fn execute_with_context<F, Fut, T, E>(
        &self,
        operation: &str,
        mut f: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("{}: attempt {} of {}", operation, attempt, max_attempts);

            let error = match f(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        info!("{} succeeded after {} attempts", operation, attempt);
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                warn!("{} failed with non-retryable error: {}", operation, error);
                return Err(RetryError::NonRetryable(error));
            }

            if attempt >= max_attempts {
                warn!("{} failed after {} attempts: {}", operation, attempt, error);
                return Err(RetryError::MaxAttemptsExceeded {
                    attempts: attempt,
                    last_error: error,
                });
            }

            // A server hint may shorten the wait but never exceed max_delay
            let delay = error
                .retry_delay()
                .map(|hint| hint.min(self.policy.max_delay))
                .unwrap_or_else(|| self.policy.delay_for_attempt(attempt));
            warn!(
                "{} attempt {} failed: {}. Retrying in {:?}",
                operation, attempt, error, delay
            );
            sleep(delay).await;

            attempt += 1;
        }
    }
}

/// Retry error types
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last_error}")]
    MaxAttemptsExceeded { attempts: u32, last_error: E },

    #[error("{0}")]
    NonRetryable(E),
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::MaxAttemptsExceeded { attempts, .. } => *attempts,
            RetryError::NonRetryable(_) => 1,
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            RetryError::MaxAttemptsExceeded { last_error, .. } => last_error,
            RetryError::NonRetryable(error) => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "retryable={}", self.retryable)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[derive(Debug)]
    struct ThrottledError {
        retry_after: Duration,
    }

    impl std::fmt::Display for ThrottledError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "throttled, retry after {:?}", self.retry_after)
        }
    }

    impl Retryable for ThrottledError {
        fn is_retryable(&self) -> bool {
            true
        }

        fn retry_delay(&self) -> Option<Duration> {
            Some(self.retry_after)
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::exponential(max_attempts, Duration::from_millis(10), Duration::from_millis(40))
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let executor = RetryExecutor::new(fast_policy(3));

        let result = executor
            .execute("flaky", || {
                let count = counter_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if count < 2 {
                        Err(TestError { retryable: true })
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_max_attempts_exceeded() {
        let executor = RetryExecutor::new(fast_policy(2));

        let result: Result<(), _> = executor
            .execute("always-down", || async { Err(TestError { retryable: true }) })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 2);
        assert!(matches!(err, RetryError::MaxAttemptsExceeded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let executor = RetryExecutor::new(fast_policy(5));

        let result: Result<(), _> = executor
            .execute("bad-request", || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError { retryable: false }) }
            })
            .await;

        assert!(matches!(result.unwrap_err(), RetryError::NonRetryable(_)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_are_slept() {
        let executor = RetryExecutor::new(fast_policy(3));
        let started = tokio::time::Instant::now();

        let _: Result<(), _> = executor
            .execute("timed", || async { Err(TestError { retryable: true }) })
            .await;

        // 10ms after attempt 1, 20ms after attempt 2
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_delay_hint_is_capped_at_max_delay() {
        let executor = RetryExecutor::new(RetryPolicy::exponential(
            2,
            Duration::from_millis(500),
            Duration::from_secs(10),
        ));
        let started = tokio::time::Instant::now();

        let _: Result<(), _> = executor
            .execute("throttled", || async {
                Err(ThrottledError {
                    retry_after: Duration::from_secs(86_400),
                })
            })
            .await;

        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_server_delay_hint_is_honoured() {
        let executor = RetryExecutor::new(RetryPolicy::exponential(
            2,
            Duration::from_millis(500),
            Duration::from_secs(10),
        ));
        let started = tokio::time::Instant::now();

        let _: Result<(), _> = executor
            .execute("throttled", || async {
                Err(ThrottledError {
                    retry_after: Duration::from_secs(3),
                })
            })
            .await;

        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_execute_with_context_passes_attempt() {
        let executor = RetryExecutor::new(fast_policy(3));

        let result = executor
            .execute_with_context("ctx", |attempt| async move {
                if attempt < 2 {
                    Err(TestError { retryable: true })
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_policy_yaml_uses_humantime() {
        let policy: RetryPolicy = serde_yaml::from_str(
            "max_attempts: 6\ninitial_delay: 250ms\nmax_delay: 5s\nbackoff:\n  type: linear\njitter: false\n",
        )
        .unwrap();

        assert_eq!(policy.max_attempts, 6);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(5));
        assert_eq!(policy.backoff, BackoffStrategy::Linear);
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(750));
    }
}
