//! # Reboot Invitation
//!
//! The contributor invitation lifecycle: admins issue single-use, expiring
//! invite codes; redeeming one elevates a reader account to contributor.
//! Contributor applications feed the same flow — approving an application
//! issues a linked invitation.
//!
//! # Architecture
//!
//! - Invite codes carry 256 bits of entropy from the injected entropy port
//! - Redemption is a store-level conditional write: two concurrent
//!   redemptions of one code yield exactly one success
//! - `issue_from_application` is a small saga: the invitation is issued
//!   first, the application approval is the conditional second step, and a
//!   lost approval race deletes the invitation again

#![warn(missing_docs)]

pub mod application;
pub mod code;
pub mod invitation;
pub mod service;
pub mod store;

pub use application::{ApplicationStatus, ContributorApplication, NewApplication};
pub use invitation::{
    Invitation, IssuedInvitation, METADATA_APPLICATION_ID, METADATA_FULL_NAME,
};
pub use service::{InvitationConfig, InvitationService};
pub use store::{ApplicationStore, InvitationStore};
