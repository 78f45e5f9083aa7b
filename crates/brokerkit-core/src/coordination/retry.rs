//! Fixed-delay retry policy for coordination operations
//!
//! Test backends are ephemeral, so the policy is a bounded number of retries
//! after a fixed sleep. Only [`CoordinationError::is_retryable`] failures are
//! retried.

use crate::errors::CoordinationError;
use std::time::Duration;

/// Bounded, fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Delay used by [`RetryPolicy::default`]
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    /// Retry at most once, after `delay`
    pub fn one_time(delay: Duration) -> Self {
        Self::new(1, delay)
    }

    /// Never retry
    pub fn never() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Retry up to `max_retries` times with a fixed `delay`
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Maximum number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Sleep between attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op`, retrying retryable failures within the budget
    ///
    /// Blocks the calling thread for `delay` between attempts. The last error
    /// is returned once the budget is spent.
    pub fn run<T, F>(&self, operation: &str, mut op: F) -> Result<T, CoordinationError>
    where
        F: FnMut() -> Result<T, CoordinationError>,
    {
        let mut retries = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    tracing::warn!(
                        operation,
                        retry = retries,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "retrying coordination operation"
                    );
                    std::thread::sleep(self.delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::one_time(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn loss() -> CoordinationError {
        CoordinationError::connection_loss("zk:2181", "refused")
    }

    #[test]
    fn test_default_is_retry_one_time() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 1);
        assert_eq!(policy.delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_single_failure_is_retried() {
        let attempts = Cell::new(0);
        let policy = RetryPolicy::one_time(Duration::from_millis(1));
        let result = policy.run("connect", || {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(loss())
            } else {
                Ok(7)
            }
        });
        assert_eq!(result, Ok(7));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_budget_is_one_retry() {
        let attempts = Cell::new(0);
        let policy = RetryPolicy::one_time(Duration::from_millis(1));
        let result: Result<(), _> = policy.run("connect", || {
            attempts.set(attempts.get() + 1);
            Err(loss())
        });
        assert_eq!(result, Err(loss()));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_non_retryable_fails_immediately() {
        let attempts = Cell::new(0);
        let policy = RetryPolicy::one_time(Duration::from_millis(1));
        let result: Result<(), _> = policy.run("create", || {
            attempts.set(attempts.get() + 1);
            Err(CoordinationError::node_exists("/a"))
        });
        assert_eq!(result, Err(CoordinationError::node_exists("/a")));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_never_does_not_retry() {
        let attempts = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::never().run("connect", || {
            attempts.set(attempts.get() + 1);
            Err(loss())
        });
        assert!(result.is_err());
        assert_eq!(attempts.get(), 1);
    }
}
