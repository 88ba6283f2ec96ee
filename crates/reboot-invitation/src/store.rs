//! Invitation and application store ports
//!
//! Both ports carry a conditional write: `mark_used` succeeds only while
//! `used_at_ms` is still null, and `decide` only while the application is
//! still pending. Those two writes are what make redemption single-use and
//! application review one-shot under concurrency.

use async_trait::async_trait;
use reboot_core::{ActorId, ApplicationId, InvitationId, Result, TimestampMs};

use crate::application::{ApplicationStatus, ContributorApplication};
use crate::invitation::Invitation;

/// Row store for invitations
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Point lookup by id, `NotFound` if absent
    async fn get(&self, id: InvitationId) -> Result<Invitation>;

    /// Point lookup by unique code
    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>>;

    /// Insert a new row; `Conflict` on a duplicate id or code
    async fn insert(&self, invitation: Invitation) -> Result<()>;

    /// Mark the invitation used iff `used_at_ms` is still null.
    ///
    /// Sets `used_at_ms` and `used_by` together. A redemption that loses
    /// the race observes `AlreadyUsed`; exactly one of any number of
    /// concurrent attempts succeeds.
    async fn mark_used(
        &self,
        id: InvitationId,
        used_by: ActorId,
        used_at_ms: TimestampMs,
    ) -> Result<Invitation>;

    /// Give a redemption back, iff the row records `used_by` as the actor
    /// being compensated.
    ///
    /// Clears `used_at_ms` and `used_by` together. This is the redemption
    /// saga's compensation step: when the profile elevation fails after
    /// `mark_used`, the code is returned so the invitee can redeem again.
    /// `Conflict` when the row is unused or was redeemed by someone else.
    async fn clear_use(&self, id: InvitationId, used_by: ActorId) -> Result<Invitation>;

    /// Hard delete a row; `NotFound` if absent.
    ///
    /// Used only by the issuance saga's compensation step.
    async fn delete(&self, id: InvitationId) -> Result<()>;

    /// All invitations issued by the given admin, newest first
    async fn list_by_inviter(&self, invited_by: ActorId) -> Result<Vec<Invitation>>;
}

/// Row store for contributor applications
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Point lookup by id, `NotFound` if absent
    async fn get(&self, id: ApplicationId) -> Result<ContributorApplication>;

    /// Insert a new row; `Conflict` on a duplicate id
    async fn insert(&self, application: ContributorApplication) -> Result<()>;

    /// Decide the application iff it is still `Pending`.
    ///
    /// `status` must be `Approved` or `Rejected`; sets `reviewed_by` and
    /// `reviewed_at_ms`. A second decision observes `Conflict` and leaves
    /// the stored row unchanged.
    async fn decide(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        reviewed_by: ActorId,
        reviewed_at_ms: TimestampMs,
    ) -> Result<ContributorApplication>;

    /// All undecided applications, oldest first
    async fn list_pending(&self) -> Result<Vec<ContributorApplication>>;
}
