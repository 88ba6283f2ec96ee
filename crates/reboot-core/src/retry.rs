//! Bounded retry with backoff for transport-class store failures
//!
//! Only errors whose `is_retryable()` is true are retried: timeouts and
//! unavailability. Conflicts, validation, and permission failures surface
//! immediately. Callers apply this to reads and to conditional (CAS)
//! writes, which are safe to re-issue.

use std::future::Future;
use std::time::Duration;

use crate::Result;

/// Retry policy for store calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 disables retries)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each failure
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
        }
    }
}

/// Run `op`, retrying retryable failures per `policy`.
///
/// The final error is returned unchanged once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut delay_ms = policy.base_delay_ms;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < attempts => {
                tracing::debug!(attempt, delay_ms, %err, "retrying store call");
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                delay_ms = delay_ms.saturating_mul(2);
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("retry loop always returns within max_attempts")
}
