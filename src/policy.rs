use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Retry policy applied by the dispatcher to descriptors with `auto_retry() == true`.
///
/// Defaults to zero retries: resending is opt-in per transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_delay_ms: u32,
    /// Upper bound for any single delay, including server `Retry-After` hints.
    /// Values below `min_delay_ms` are raised to it.
    pub max_delay_ms: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, min_delay_ms: u32, max_delay_ms: u32) -> Self {
        Self {
            max_retries,
            min_delay_ms,
            max_delay_ms,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    fn cap_ms(&self) -> u32 {
        self.max_delay_ms.max(self.min_delay_ms)
    }

    /// Exponential backoff (`min_delay * 2^attempt`), replaced by the server hint when present.
    pub fn backoff_delay(&self, attempt: u32, retry_after_ms: Option<u32>) -> Duration {
        let base = if self.min_delay_ms == 0 {
            0
        } else {
            let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
            self.min_delay_ms.saturating_mul(factor)
        };
        let chosen = retry_after_ms.unwrap_or(base).min(self.cap_ms());
        Duration::from_millis(chosen as u64)
    }

    /// Decide what to do next after an attempt failed.
    ///
    /// `attempt` is 0-based (first failure => attempt=0).
    pub fn decide(&self, err: &Error, attempt: u32, auto_retry: bool) -> Decision {
        if auto_retry && err.is_retryable() && attempt < self.max_retries {
            return Decision::Retry {
                delay: self.backoff_delay(attempt, err.retry_after_ms()),
            };
        }
        Decision::Fail
    }
}
