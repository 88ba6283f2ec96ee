//! Recording and failing notification senders

use async_trait::async_trait;
use parking_lot::Mutex;
use reboot_core::{RebootError, Result};
use reboot_moderation::{ModerationNotice, NotificationSender};

/// Sender that records every notice instead of delivering it
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<ModerationNotice>>,
}

impl RecordingSender {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order
    pub fn sent(&self) -> Vec<ModerationNotice> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, notice: &ModerationNotice) -> Result<()> {
        self.sent.lock().push(notice.clone());
        Ok(())
    }
}

/// Sender whose transport is always down
#[derive(Debug, Default)]
pub struct FailingSender {
    attempts: Mutex<u32>,
}

impl FailingSender {
    /// Create a failing sender
    pub fn new() -> Self {
        Self::default()
    }

    /// How many sends were attempted
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }
}

#[async_trait]
impl NotificationSender for FailingSender {
    async fn send(&self, _notice: &ModerationNotice) -> Result<()> {
        *self.attempts.lock() += 1;
        Err(RebootError::unavailable("notification transport down"))
    }
}
