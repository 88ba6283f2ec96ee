//! Invitation service
//!
//! Coordinator for invitation issuance, redemption, and application review.
//! Role gate first, validation second, then the store writes; the only
//! multi-write operation (`issue_from_application`) compensates on failure
//! so an application is never left approved without its invitation.

use std::collections::BTreeMap;
use std::sync::Arc;

use reboot_core::{
    with_retry, ActorId, ApplicationId, ClockEffects, EntropyEffects, InvitationId, Profile,
    ProfileDirectory, RebootError, Result, RetryPolicy, TimestampMs,
};

use crate::application::{
    validate_email, ApplicationStatus, ContributorApplication, NewApplication,
};
use crate::code::generate_code;
use crate::invitation::{
    Invitation, IssuedInvitation, METADATA_APPLICATION_ID, METADATA_FULL_NAME,
};
use crate::store::{ApplicationStore, InvitationStore};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the invitation service
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Expiry window applied at issuance
    pub expiry_window_ms: TimestampMs,

    /// Base of the shareable redemption link; the code is appended as the
    /// `invite` query parameter
    pub redeem_base_url: String,

    /// Retry policy for store reads and conditional writes
    pub retry: RetryPolicy,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry_window_ms: 7 * 24 * 60 * 60 * 1000, // 7 days
            redeem_base_url: "/signup".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Coordinator for the invitation lifecycle
pub struct InvitationService {
    invitations: Arc<dyn InvitationStore>,
    applications: Arc<dyn ApplicationStore>,
    profiles: Arc<dyn ProfileDirectory>,
    clock: Arc<dyn ClockEffects>,
    entropy: Arc<dyn EntropyEffects>,
    config: InvitationConfig,
}

impl InvitationService {
    /// Create a new invitation service over the given ports
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        applications: Arc<dyn ApplicationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        clock: Arc<dyn ClockEffects>,
        entropy: Arc<dyn EntropyEffects>,
        config: InvitationConfig,
    ) -> Self {
        Self {
            invitations,
            applications,
            profiles,
            clock,
            entropy,
            config,
        }
    }

    /// Get the service configuration
    pub fn config(&self) -> &InvitationConfig {
        &self.config
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Issue an invitation to `email`, returning the row and its link.
    pub async fn issue(
        &self,
        actor: &Profile,
        email: &str,
        message: Option<String>,
        metadata: BTreeMap<String, String>,
    ) -> Result<IssuedInvitation> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to issue invitations",
            ));
        }
        validate_email(email)?;
        self.issue_unchecked(actor.actor_id, email, message, metadata)
            .await
    }

    /// Issuance body shared with the application saga; the caller has
    /// already passed the role gate.
    async fn issue_unchecked(
        &self,
        invited_by: ActorId,
        email: &str,
        message: Option<String>,
        metadata: BTreeMap<String, String>,
    ) -> Result<IssuedInvitation> {
        let now_ms = self.clock.now_ms().await?;
        let code = generate_code(self.entropy.as_ref()).await?;
        let invitation = Invitation {
            id: InvitationId::new(),
            email: email.to_string(),
            code: code.clone(),
            invited_by,
            message,
            metadata,
            expires_at_ms: now_ms + self.config.expiry_window_ms,
            used_at_ms: None,
            used_by: None,
            created_at_ms: now_ms,
        };
        self.invitations.insert(invitation.clone()).await?;
        tracing::info!(
            invitation_id = %invitation.id,
            expires_at_ms = invitation.expires_at_ms,
            "invitation issued"
        );
        Ok(IssuedInvitation {
            redeem_link: format!("{}?invite={}", self.config.redeem_base_url, code),
            invitation,
        })
    }

    // =========================================================================
    // Redemption
    // =========================================================================

    /// Redeem an invite code on behalf of a freshly signed-up actor.
    ///
    /// Failures stay distinguishable: `NotFound` for an unknown code,
    /// `Expired` for a stale one (leaving it unredeemed), `AlreadyUsed`
    /// once redeemed — including when a concurrent redemption wins the
    /// store-level race. Success marks the invitation used and elevates the
    /// actor's profile to contributor with the verified flag set.
    ///
    /// Saga ordering: `mark_used` wins the single-use race first, then the
    /// profile elevation runs with retries. When the elevation still fails
    /// the redemption is given back (`used_at_ms`/`used_by` cleared) before
    /// the error surfaces, so a directory outage cannot burn the one-time
    /// code with nobody elevated.
    pub async fn redeem(&self, code: &str, actor_id: ActorId) -> Result<Invitation> {
        let invitation = with_retry(&self.config.retry, || self.invitations.find_by_code(code))
            .await?
            .ok_or_else(|| RebootError::not_found("no invitation matches this code"))?;

        let now_ms = self.clock.now_ms().await?;
        if invitation.is_expired(now_ms) {
            return Err(RebootError::expired(invitation.expires_at_ms));
        }
        if invitation.is_used() {
            return Err(RebootError::AlreadyUsed);
        }

        let redeemed = with_retry(&self.config.retry, || {
            self.invitations.mark_used(invitation.id, actor_id, now_ms)
        })
        .await?;

        let elevation = with_retry(&self.config.retry, || {
            self.profiles.elevate_to_contributor(actor_id)
        })
        .await;
        let profile = match elevation {
            Ok(profile) => profile,
            Err(err) => {
                // Compensation: the actor was never elevated, so the code
                // must become redeemable again.
                if let Err(revert_err) = self.invitations.clear_use(invitation.id, actor_id).await
                {
                    tracing::warn!(
                        invitation_id = %invitation.id,
                        actor_id = %actor_id,
                        %revert_err,
                        "failed to return invitation after failed elevation"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(
            invitation_id = %redeemed.id,
            actor_id = %actor_id,
            role = %profile.role,
            "invitation redeemed"
        );
        Ok(redeemed)
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Accept a public contributor application.
    pub async fn submit_application(
        &self,
        input: NewApplication,
    ) -> Result<ContributorApplication> {
        let now_ms = self.clock.now_ms().await?;
        let application = ContributorApplication::new(input, now_ms)?;
        self.applications.insert(application.clone()).await?;
        tracing::info!(application_id = %application.id, "contributor application received");
        Ok(application)
    }

    /// The admin application review queue, oldest first.
    pub async fn pending_applications(
        &self,
        actor: &Profile,
    ) -> Result<Vec<ContributorApplication>> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to review applications",
            ));
        }
        with_retry(&self.config.retry, || self.applications.list_pending()).await
    }

    /// Reject a pending application. Terminal; a second decision observes
    /// `Conflict`.
    pub async fn reject_application(
        &self,
        actor: &Profile,
        application_id: ApplicationId,
    ) -> Result<ContributorApplication> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to review applications",
            ));
        }
        let now_ms = self.clock.now_ms().await?;
        let application = with_retry(&self.config.retry, || {
            self.applications.decide(
                application_id,
                ApplicationStatus::Rejected,
                actor.actor_id,
                now_ms,
            )
        })
        .await?;
        tracing::info!(application_id = %application_id, "application rejected");
        Ok(application)
    }

    /// Approve a pending application and issue its linked invitation.
    ///
    /// Saga ordering: the invitation is issued first, then the application
    /// is approved through the conditional write. When the approval loses a
    /// race the invitation is deleted again and `Conflict` surfaces, so the
    /// application is never approved without an invitation and never left
    /// half-decided.
    pub async fn issue_from_application(
        &self,
        actor: &Profile,
        application_id: ApplicationId,
        message: Option<String>,
    ) -> Result<IssuedInvitation> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to review applications",
            ));
        }

        let application = with_retry(&self.config.retry, || {
            self.applications.get(application_id)
        })
        .await?;
        if !application.is_pending() {
            return Err(RebootError::conflict(format!(
                "application is already `{}`",
                application.status
            )));
        }

        let mut metadata = BTreeMap::new();
        metadata.insert(
            METADATA_APPLICATION_ID.to_string(),
            application.id.to_string(),
        );
        metadata.insert(METADATA_FULL_NAME.to_string(), application.full_name.clone());

        let issued = self
            .issue_unchecked(actor.actor_id, &application.email, message, metadata)
            .await?;

        let now_ms = self.clock.now_ms().await?;
        let approval = with_retry(&self.config.retry, || {
            self.applications.decide(
                application_id,
                ApplicationStatus::Approved,
                actor.actor_id,
                now_ms,
            )
        })
        .await;

        if let Err(err) = approval {
            // Compensation: the approval lost, so the invitation must go.
            if let Err(delete_err) = self.invitations.delete(issued.invitation.id).await {
                tracing::warn!(
                    invitation_id = %issued.invitation.id,
                    %delete_err,
                    "failed to delete invitation after lost approval race"
                );
            }
            return Err(err);
        }

        tracing::info!(
            application_id = %application_id,
            invitation_id = %issued.invitation.id,
            "application approved and invitation issued"
        );
        Ok(issued)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Invitations previously issued by the acting admin.
    pub async fn issued_by(&self, actor: &Profile) -> Result<Vec<Invitation>> {
        if !actor.role.is_admin() {
            return Err(RebootError::permission_denied(
                "admin role required to list invitations",
            ));
        }
        with_retry(&self.config.retry, || {
            self.invitations.list_by_inviter(actor.actor_id)
        })
        .await
    }
}
