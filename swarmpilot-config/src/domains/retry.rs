//! Retry policy validation
//!
//! The policy type itself belongs to the resilience crate, which executes it.

use crate::error::ConfigResult;
use crate::validation::Validatable;
use swarmpilot_resilience::{BackoffStrategy, RetryPolicy};

impl Validatable for RetryPolicy {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(self.validation_error("max_attempts must be at least 1"));
        }
        if self.initial_delay > self.max_delay {
            return Err(self.validation_error(format!(
                "initial_delay ({:?}) cannot exceed max_delay ({:?})",
                self.initial_delay, self.max_delay
            )));
        }
        if let BackoffStrategy::Exponential { base } = self.backoff {
            if !(base.is_finite() && base >= 1.0) {
                return Err(self.validation_error(format!(
                    "exponential backoff base must be at least 1.0, got {}",
                    base
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "retry"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(RetryPolicy::no_retry().validate().is_ok());
    }

    #[test]
    fn test_invalid_policies() {
        let zero = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert!(zero.validate().is_err());

        let inverted = RetryPolicy::exponential(3, Duration::from_secs(5), Duration::from_secs(1));
        assert!(inverted.validate().is_err());

        let shrinking = RetryPolicy {
            backoff: BackoffStrategy::Exponential { base: 0.5 },
            ..RetryPolicy::default()
        };
        assert!(shrinking.validate().is_err());
    }
}
