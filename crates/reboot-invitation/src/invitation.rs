//! Invitation record and validity rules

use reboot_core::{ActorId, InvitationId, RebootError, Result, TimestampMs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key linking an invitation to the application it approves
pub const METADATA_APPLICATION_ID: &str = "application_id";

/// Metadata key carrying the applicant's full name
pub const METADATA_FULL_NAME: &str = "full_name";

/// A single-use, expiring contributor invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Row identifier
    pub id: InvitationId,
    /// Address the invitation was sent to
    pub email: String,
    /// Unique, unguessable redemption code
    pub code: String,
    /// Admin who issued the invitation
    pub invited_by: ActorId,
    /// Optional free-text message shown to the invitee
    pub message: Option<String>,
    /// Arbitrary linkage metadata (e.g. the approved application id)
    pub metadata: BTreeMap<String, String>,
    /// Expiry time; redemption requires `now < expires_at_ms`
    pub expires_at_ms: TimestampMs,
    /// Redemption time, set at most once
    pub used_at_ms: Option<TimestampMs>,
    /// Redeeming actor, set together with `used_at_ms`
    pub used_by: Option<ActorId>,
    /// Issuance time
    pub created_at_ms: TimestampMs,
}

impl Invitation {
    /// Whether the expiry window has passed
    pub fn is_expired(&self, now_ms: TimestampMs) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Whether the invitation has been redeemed
    pub fn is_used(&self) -> bool {
        self.used_at_ms.is_some()
    }

    /// Whether the invitation can still be redeemed at `now_ms`
    pub fn is_redeemable(&self, now_ms: TimestampMs) -> bool {
        !self.is_used() && !self.is_expired(now_ms)
    }

    /// Verify that `used_at_ms` and `used_by` are set together
    pub fn check_invariants(&self) -> Result<()> {
        if self.used_at_ms.is_some() != self.used_by.is_some() {
            return Err(RebootError::internal(
                "used_at_ms and used_by must be set together",
            ));
        }
        Ok(())
    }
}

/// An issued invitation together with its shareable redemption link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedInvitation {
    /// The stored invitation row
    pub invitation: Invitation,
    /// Link embedding the code, e.g. `/signup?invite={code}`
    pub redeem_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(expires_at_ms: u64) -> Invitation {
        Invitation {
            id: InvitationId::new(),
            email: "writer@example.com".to_string(),
            code: "test-code".to_string(),
            invited_by: ActorId::new(),
            message: None,
            metadata: BTreeMap::new(),
            expires_at_ms,
            used_at_ms: None,
            used_by: None,
            created_at_ms: 0,
        }
    }

    #[test]
    fn test_redeemable_window() {
        let inv = invitation(1_000);
        assert!(inv.is_redeemable(999));
        assert!(!inv.is_redeemable(1_000)); // expiry boundary is exclusive
        assert!(!inv.is_redeemable(2_000));
    }

    #[test]
    fn test_used_is_not_redeemable() {
        let mut inv = invitation(1_000);
        inv.used_at_ms = Some(500);
        inv.used_by = Some(ActorId::new());
        assert!(inv.is_used());
        assert!(!inv.is_redeemable(600));
        inv.check_invariants().unwrap();
    }

    #[test]
    fn test_invariant_pairing() {
        let mut inv = invitation(1_000);
        inv.used_at_ms = Some(500);
        assert!(inv.check_invariants().is_err());
    }
}
