//! Retry Mechanism Module
//!
//! Bounded retries with a linear backoff: after a transient failure on attempt
//! `i` (starting at 0) the executor sleeps `i` backoff units before the next
//! attempt. Only errors for which [`MeilisearchError::is_retryable`] holds are
//! retried; anything else ends the loop immediately.

use std::time::Duration;
use tokio::time::sleep;

use crate::defaults;
use crate::error::MeilisearchError;

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Duration of one backoff step
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::http::MAX_RETRIES,
            backoff_unit: defaults::retry::BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Total number of attempts, `max_retries + 1`.
    pub const fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sleep that follows a transient failure on attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }
}

/// Retry executor that handles the actual retry logic
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// budget is spent. The last transient error is returned on exhaustion.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, MeilisearchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T, MeilisearchError>>,
    {
        let attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) => error,
            };

            if attempt + 1 >= attempts {
                tracing::warn!(attempts, error = %error, "retries exhausted");
                return Err(error);
            }

            let delay = self.policy.delay_for(attempt);
            tracing::debug!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "transient failure, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tracing_test::traced_test;

    #[test]
    fn attempts_and_linear_delays() {
        let policy = RetryPolicy::new()
            .with_max_retries(3)
            .with_backoff_unit(Duration::from_millis(100));

        assert_eq!(policy.attempts(), 4);
        assert_eq!(policy.delay_for(0), Duration::ZERO);
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(RetryPolicy::default().attempts(), 1);

        let executor = RetryExecutor::new(policy);
        assert_eq!(executor.policy().attempts(), 4);
        assert_eq!(executor.policy().delay_for(3), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_all_attempts_on_persistent_failure() {
        for max_retries in 0..4 {
            let counter = Arc::new(AtomicU32::new(0));
            let executor = RetryExecutor::new(RetryPolicy::new().with_max_retries(max_retries));

            let result: Result<(), _> = executor
                .execute(|_| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err(MeilisearchError::communication("connection refused"))
                    }
                })
                .await;

            assert_eq!(
                result,
                Err(MeilisearchError::communication("connection refused"))
            );
            assert_eq!(counter.load(Ordering::SeqCst), max_retries + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_error_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let executor = RetryExecutor::new(RetryPolicy::new().with_max_retries(5));

        let result: Result<(), _> = executor
            .execute(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(MeilisearchError::api_error(500, "Internal Server Error", ""))
                }
            })
            .await;

        assert_eq!(result.unwrap_err().status_code(), Some(500));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_grow_linearly_between_attempts() {
        let started = tokio::time::Instant::now();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let executor = RetryExecutor::new(RetryPolicy::new().with_max_retries(5));

        let result = executor
            .execute(|attempt| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(started.elapsed());
                    if attempt < 3 {
                        Err(MeilisearchError::timeout("connect timed out"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        // Sleeps of 0s, 1s and 2s separate the four attempts.
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Duration::ZERO,
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(3),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn logs_retries_and_exhaustion() {
        let executor = RetryExecutor::new(RetryPolicy::new().with_max_retries(2));

        let _ = executor
            .execute(|_| async { Err::<(), _>(MeilisearchError::communication("reset by peer")) })
            .await;

        assert!(logs_contain("transient failure, retrying"));
        assert!(logs_contain("delay_ms=1000"));
        assert!(logs_contain("retries exhausted"));
    }
}
