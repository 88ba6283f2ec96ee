//! Moderation notification dispatch
//!
//! Notices are a post-commit side effect of an admin decision. Delivery is
//! best-effort: a transport failure is logged and absorbed, never surfaced
//! as a failure of the decision that triggered it.

use async_trait::async_trait;
use reboot_core::{ProfileDirectory, Result};
use serde::{Deserialize, Serialize};

use crate::post::Post;

/// Payload sent to the post author after a moderation decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationNotice {
    /// Author contact address
    pub recipient_email: String,
    /// Title of the decided post
    pub post_title: String,
    /// True for an approval, false for a rejection
    pub approved: bool,
    /// Reviewer notes attached to the decision, if any
    pub reviewer_notes: Option<String>,
}

/// Outbound notification transport
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a notice; transport failures surface as errors here and are
    /// absorbed by the dispatcher
    async fn send(&self, notice: &ModerationNotice) -> Result<()>;
}

/// Build and send the decision notice for a freshly decided post.
///
/// Never returns an error: a missing author profile or a failed send is
/// logged at warn level and the caller's committed transition stands.
pub async fn dispatch_decision_notice(
    sender: &dyn NotificationSender,
    profiles: &dyn ProfileDirectory,
    post: &Post,
    approved: bool,
) {
    let recipient_email = match profiles.get(post.author_id).await {
        Ok(profile) => profile.email,
        Err(err) => {
            tracing::warn!(
                post_id = %post.id,
                author_id = %post.author_id,
                %err,
                "skipping decision notice: author profile unavailable"
            );
            return;
        }
    };

    let notice = ModerationNotice {
        recipient_email,
        post_title: post.title.clone(),
        approved,
        reviewer_notes: post.reviewer_notes.clone(),
    };

    match sender.send(&notice).await {
        Ok(()) => {
            tracing::debug!(post_id = %post.id, approved, "decision notice sent");
        }
        Err(err) => {
            tracing::warn!(
                post_id = %post.id,
                approved,
                %err,
                "decision notice failed; transition already committed"
            );
        }
    }
}
