//! Retry policy for API calls.

use std::time::Duration;

use reqwest::StatusCode;

use super::{TransportError, TransportResponse};
use crate::config::RetryConfig;

/// Bounded retry with a fixed pause between attempts.
///
/// Only transport failures and 5xx responses are retried; a 4xx answer is
/// final on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the initial one.
    ///
    /// A value of 1 disables retries.
    pub max_attempts: u32,

    /// Pause between two consecutive attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backoff: Self::DEFAULT_BACKOFF,
        }
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is 0.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts >= 1, "max_attempts must be at least 1");
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Whether an attempt with the given outcome may be retried.
    pub fn is_retryable(&self, outcome: &Result<TransportResponse, TransportError>) -> bool {
        match outcome {
            Ok(response) => is_retryable_status(response.status),
            Err(e) => e.is_transient(),
        }
    }

    /// Whether another attempt is allowed after attempt number `attempt`
    /// (1-based).
    pub const fn has_attempts_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Total time spent sleeping between attempts when every attempt fails.
    pub fn worst_case_backoff(&self) -> Duration {
        self.backoff * self.max_attempts.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl From<RetryConfig> for RetryPolicy {
    /// `times` counts total attempts; 0 is treated as 1.
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.times.max(1),
            backoff: config.sleep_duration(),
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.as_u16() >= 500
}
