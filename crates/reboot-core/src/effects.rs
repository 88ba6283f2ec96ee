//! Effect ports for wall-clock time and entropy
//!
//! Services never read the system clock or an RNG ambiently; they hold a
//! port handle injected at construction. This keeps every expiry and
//! invite-code decision deterministic under test (the testkit provides
//! `FixedClock` and `SeededEntropy` handlers).

use async_trait::async_trait;
use rand::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{RebootError, Result, TimestampMs};

/// Wall-clock time port
#[async_trait]
pub trait ClockEffects: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    async fn now_ms(&self) -> Result<TimestampMs>;
}

/// Entropy port for unguessable token material
#[async_trait]
pub trait EntropyEffects: Send + Sync {
    /// Fill the buffer with random bytes
    async fn fill_bytes(&self, buf: &mut [u8]) -> Result<()>;
}

/// Production clock reading the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl ClockEffects for SystemClock {
    async fn now_ms(&self) -> Result<TimestampMs> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| RebootError::internal(format!("system clock before epoch: {e}")))?;
        Ok(elapsed.as_millis() as u64)
    }
}

/// Production entropy source backed by the operating system RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

#[async_trait]
impl EntropyEffects for OsEntropy {
    async fn fill_bytes(&self, buf: &mut [u8]) -> Result<()> {
        rand::rngs::OsRng
            .try_fill_bytes(buf)
            .map_err(|e| RebootError::unavailable(format!("os rng: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_clock_advances() {
        let clock = SystemClock;
        let now = clock.now_ms().await.unwrap();
        // Sanity bound: after 2020-01-01, before 2100-01-01.
        assert!(now > 1_577_836_800_000);
        assert!(now < 4_102_444_800_000);
    }

    #[tokio::test]
    async fn test_os_entropy_fills_buffer() {
        let entropy = OsEntropy;
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        entropy.fill_bytes(&mut a).await.unwrap();
        entropy.fill_bytes(&mut b).await.unwrap();
        assert_ne!(a, b);
    }
}
