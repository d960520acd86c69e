//! Connect retry policy for the remote cache

use std::time::Duration;

/// Retry policy used while establishing the cache connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRetryPolicy {
    /// Total number of connect attempts (at least one is always made)
    pub max_attempts: u32,
    /// Upper bound for a single attempt; an attempt still pending is a failure
    pub attempt_timeout: Duration,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap applied to the doubled delay
    pub max_delay: Duration,
}

impl Default for ConnectRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(5000),
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ConnectRetryPolicy {
    pub fn new(max_attempts: u32, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts,
            attempt_timeout,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `retry` (0-indexed): `base * 2^retry`, capped
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);

        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
