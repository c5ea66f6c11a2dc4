// Retry logic for inventory page fetches
use crate::config::SweepConfig;
use crate::port::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Maps a 1-based attempt number to the delay before the next attempt
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Retry decision result
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try the same request again after the delay
    Retry(Duration),
    /// Stop trying this request
    GiveUp,
}

/// Bounded retry policy for transient network failures
///
/// Determines if a request should be retried based on:
/// - The kind of failure (only timeouts and connection errors qualify)
/// - Attempts made so far against the maximum allowed
/// - A pluggable delay function (exponential by default)
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffFn,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Create a retry policy with a custom delay function
    ///
    /// # Arguments
    /// * `max_attempts` - Total attempts per request, including the first
    /// * `backoff` - Delay after failed attempt `n` (1-based)
    pub fn new(max_attempts: u32, backoff: BackoffFn) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// `base * 2^attempt`: with a 1s base the waits are 2s, 4s, 8s, ...
    ///
    /// # Example
    /// ```text
    /// let policy = RetryPolicy::exponential(3, Duration::from_secs(1));
    /// assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    /// ```
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self::new(
            max_attempts,
            Arc::new(move |attempt| base.saturating_mul(2u32.saturating_pow(attempt))),
        )
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::exponential(config.max_attempts, config.backoff_base())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        (self.backoff)(attempt)
    }

    /// Decide what to do after attempt number `attempt` failed with `error`
    pub fn should_retry(&self, attempt: u32, error: &ServiceError) -> RetryDecision {
        if !error.is_transient() {
            return RetryDecision::GiveUp;
        }

        if attempt >= self.max_attempts {
            warn!(
                attempt = attempt,
                max_attempts = self.max_attempts,
                "Max retry attempts reached"
            );
            return RetryDecision::GiveUp;
        }

        RetryDecision::Retry(self.delay_for(attempt))
    }
}
