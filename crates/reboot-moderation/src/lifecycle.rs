//! Post lifecycle service
//!
//! Coordinates the moderation state machine over the injected ports. Every
//! operation follows the same shape: role gate first, input validation
//! second, then the conditional store write, then any best-effort effects.
//! No store write happens before the guards pass.

use std::sync::Arc;

use reboot_core::{
    with_retry, ClockEffects, PostId, Profile, ProfileDirectory, RebootError, Result, RetryPolicy,
};
use serde::{Deserialize, Serialize};

use crate::notify::{dispatch_decision_notice, NotificationSender};
use crate::post::{NewPost, Post, PostEdits, PostStatus, StatusPatch};
use crate::store::PostStore;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the lifecycle service
#[derive(Debug, Clone, Default)]
pub struct LifecycleConfig {
    /// Retry policy for store reads and conditional writes
    pub retry: RetryPolicy,
}

// =============================================================================
// Decisions
// =============================================================================

/// An admin's moderation decision on a pending post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Publish the post
    Approve,
    /// Send the post back to the author with notes
    Reject,
}

impl Decision {
    /// The status this decision moves the post into
    pub fn target_status(&self) -> PostStatus {
        match self {
            Decision::Approve => PostStatus::Published,
            Decision::Reject => PostStatus::Rejected,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Coordinator for the post moderation lifecycle
pub struct PostLifecycle {
    posts: Arc<dyn PostStore>,
    profiles: Arc<dyn ProfileDirectory>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn ClockEffects>,
    config: LifecycleConfig,
}

impl PostLifecycle {
    /// Create a new lifecycle service over the given ports
    pub fn new(
        posts: Arc<dyn PostStore>,
        profiles: Arc<dyn ProfileDirectory>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn ClockEffects>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            posts,
            profiles,
            notifier,
            clock,
            config,
        }
    }

    // =========================================================================
    // Authoring
    // =========================================================================

    /// Create a new draft owned by the acting contributor.
    pub async fn create_draft(&self, actor: &Profile, input: NewPost) -> Result<Post> {
        if !actor.role.can_access_cms() {
            return Err(RebootError::permission_denied(
                "contributor access required to create posts",
            ));
        }
        let now_ms = self.clock.now_ms().await?;
        let post = Post::new_draft(input, actor.actor_id, now_ms)?;
        self.posts.insert(post.clone()).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "draft created");
        Ok(post)
    }

    /// Autosave author edits to a draft or rejected post.
    ///
    /// No status change; only content fields and `updated_at_ms` move. The
    /// write is conditional on the observed status so an edit cannot land
    /// on a post an admin moved into review or published in the meantime.
    pub async fn autosave(&self, actor: &Profile, post_id: PostId, edits: PostEdits) -> Result<Post> {
        let post = self.get(post_id).await?;
        self.require_author(actor, &post)?;
        if !post.status.author_may_edit() {
            return Err(RebootError::conflict(format!(
                "post is `{}` and cannot be edited",
                post.status
            )));
        }
        let now_ms = self.clock.now_ms().await?;
        with_retry(&self.config.retry, || {
            self.posts
                .save_edits(post_id, post.status, edits.clone(), now_ms)
        })
        .await
    }

    /// Submit a draft or rejected post into the review queue.
    pub async fn submit_for_approval(
        &self,
        actor: &Profile,
        post_id: PostId,
        submission_notes: Option<String>,
    ) -> Result<Post> {
        if !actor.role.can_access_cms() {
            return Err(RebootError::permission_denied(
                "contributor access required to submit posts",
            ));
        }
        let post = self.get(post_id).await?;
        self.require_author(actor, &post)?;
        if !post.status.author_may_edit() {
            return Err(RebootError::conflict(format!(
                "post is `{}` and cannot be submitted",
                post.status
            )));
        }
        post.validate_for_submission()?;

        let now_ms = self.clock.now_ms().await?;
        let patch = StatusPatch::Submitted {
            submitted_at_ms: now_ms,
            submission_notes,
        };
        let updated = with_retry(&self.config.retry, || {
            self.posts
                .transition(post_id, post.status, patch.clone(), now_ms)
        })
        .await?;
        tracing::info!(post_id = %post_id, from = %post.status, "post submitted for approval");
        Ok(updated)
    }

    /// Hard-delete a post the actor authored.
    ///
    /// Refused while the post sits in the review queue so the moderation
    /// flow never loses rows mid-decision.
    pub async fn delete_draft(&self, actor: &Profile, post_id: PostId) -> Result<()> {
        let post = self.get(post_id).await?;
        self.require_author(actor, &post)?;
        if post.status.is_awaiting_review() {
            return Err(RebootError::conflict(
                "post is awaiting review and cannot be deleted",
            ));
        }
        self.posts.delete(post_id).await?;
        tracing::info!(post_id = %post_id, "post deleted by author");
        Ok(())
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    /// Decide a pending post: approve into `Published` or reject back to the
    /// author.
    ///
    /// The decision commits through a conditional write; the loser of two
    /// racing decisions observes `Conflict`. The author notice runs after
    /// the commit and its failure is absorbed.
    pub async fn decide(
        &self,
        actor: &Profile,
        post_id: PostId,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Post> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to decide posts",
            ));
        }
        let notes = notes.filter(|n| !n.trim().is_empty());
        if decision == Decision::Reject && notes.is_none() {
            return Err(RebootError::validation(
                "reviewer_notes",
                "required when rejecting",
            ));
        }

        let post = self.get(post_id).await?;
        if !post.status.is_awaiting_review() {
            return Err(RebootError::conflict(format!(
                "post is `{}`, not awaiting review",
                post.status
            )));
        }

        let now_ms = self.clock.now_ms().await?;
        let patch = StatusPatch::Decided {
            status: decision.target_status(),
            reviewer_id: actor.actor_id,
            reviewed_at_ms: now_ms,
            reviewer_notes: notes,
        };
        let updated = with_retry(&self.config.retry, || {
            self.posts
                .transition(post_id, PostStatus::PendingApproval, patch.clone(), now_ms)
        })
        .await?;
        tracing::info!(
            post_id = %post_id,
            decision = ?decision,
            reviewer = %actor.actor_id,
            "moderation decision committed"
        );

        let approved = decision == Decision::Approve;
        dispatch_decision_notice(
            self.notifier.as_ref(),
            self.profiles.as_ref(),
            &updated,
            approved,
        )
        .await;

        Ok(updated)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The admin review queue, oldest submission first.
    pub async fn pending_queue(&self, actor: &Profile) -> Result<Vec<Post>> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to view the review queue",
            ));
        }
        with_retry(&self.config.retry, || {
            self.posts.list_by_status(PostStatus::PendingApproval)
        })
        .await
    }

    /// Posts authored by the actor.
    pub async fn my_posts(&self, actor: &Profile) -> Result<Vec<Post>> {
        with_retry(&self.config.retry, || {
            self.posts.list_by_author(actor.actor_id)
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn get(&self, post_id: PostId) -> Result<Post> {
        with_retry(&self.config.retry, || self.posts.get(post_id)).await
    }

    fn require_author(&self, actor: &Profile, post: &Post) -> Result<()> {
        if post.author_id != actor.actor_id {
            return Err(RebootError::permission_denied(
                "only the author may perform this operation",
            ));
        }
        Ok(())
    }
}
