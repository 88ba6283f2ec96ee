//! Actor profiles and the profile directory port
//!
//! Profiles belong to the authentication provider; this core only reads
//! them for role checks and contact addresses, and performs exactly one
//! write: the reader-to-contributor elevation on invitation redemption.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ActorId, Result, Role};

/// Actor profile as the directory exposes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable actor identifier from the authentication provider
    pub actor_id: ActorId,
    /// Contact address for notifications
    pub email: String,
    /// Public display name
    pub display_name: String,
    /// Current role, consulted by the role gate
    pub role: Role,
    /// Set when the account was verified through invitation redemption
    pub verified: bool,
}

/// Directory of actor profiles
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Look up a profile by actor id, `NotFound` if absent
    async fn get(&self, actor_id: ActorId) -> Result<Profile>;

    /// Elevate a reader to contributor and mark the account verified.
    ///
    /// The role write is conditional: a `Reader` becomes `Contributor`; an
    /// account already holding contributor or admin keeps its role. The
    /// verified flag is set in every success case. Returns the updated
    /// profile.
    async fn elevate_to_contributor(&self, actor_id: ActorId) -> Result<Profile>;
}
