//! Settable test clock

use async_trait::async_trait;
use reboot_core::{ClockEffects, Result, TimestampMs};
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock that only moves when the test says so
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: AtomicU64,
}

impl FixedClock {
    /// Create a clock pinned at `now_ms`
    pub fn at(now_ms: TimestampMs) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Move the clock to an absolute time
    pub fn set(&self, now_ms: TimestampMs) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Advance the clock by a delta
    pub fn advance(&self, delta_ms: TimestampMs) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClockEffects for FixedClock {
    async fn now_ms(&self) -> Result<TimestampMs> {
        Ok(self.now_ms.load(Ordering::SeqCst))
    }
}
