//! Post store port
//!
//! The backing store is row-oriented and remote; every status-changing
//! write is conditional on the expected current status so concurrent
//! moderation decisions cannot silently overwrite each other.

use async_trait::async_trait;
use reboot_core::{ActorId, PostId, Result, TimestampMs};

use crate::post::{Post, PostEdits, PostStatus, StatusPatch};

/// Row store for posts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Point lookup by id, `NotFound` if absent
    async fn get(&self, id: PostId) -> Result<Post>;

    /// Point lookup by unique slug
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// Insert a new row; `Conflict` on a duplicate id or slug
    async fn insert(&self, post: Post) -> Result<()>;

    /// Apply author edits iff the row still holds `expected` status.
    ///
    /// Returns the updated row, `Conflict` when the status moved underneath
    /// the editor, `NotFound` when the row is gone.
    async fn save_edits(
        &self,
        id: PostId,
        expected: PostStatus,
        edits: PostEdits,
        now_ms: TimestampMs,
    ) -> Result<Post>;

    /// Apply a status patch iff the row still holds `expected` status.
    ///
    /// This is the compare-and-swap write at the heart of the moderation
    /// flow: exactly one of two racing transitions lands, the other
    /// observes `Conflict`.
    async fn transition(
        &self,
        id: PostId,
        expected: PostStatus,
        patch: StatusPatch,
        now_ms: TimestampMs,
    ) -> Result<Post>;

    /// Hard delete a row; `NotFound` if absent
    async fn delete(&self, id: PostId) -> Result<()>;

    /// All rows holding the given status, oldest submission first
    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>>;

    /// All rows authored by the given actor, newest update first
    async fn list_by_author(&self, author_id: ActorId) -> Result<Vec<Post>>;
}
