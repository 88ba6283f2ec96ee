//! Role gate for the Reboot workflow
//!
//! Roles are a closed enum, not strings: unknown values are rejected at
//! deserialization instead of silently failing string comparisons. The
//! predicates here are pure and synchronous; every mutating operation in
//! the moderation and invitation crates consults them before touching a
//! store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three account roles of the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Default role for a signed-up account: may read, comment, apply
    Reader,
    /// May author posts and submit them for review
    Contributor,
    /// May moderate posts, review applications, and issue invitations
    Admin,
}

impl Role {
    /// Exact match: is this a reader account
    pub fn is_reader(&self) -> bool {
        matches!(self, Role::Reader)
    }

    /// Exact match: is this a contributor account
    pub fn is_contributor(&self) -> bool {
        matches!(self, Role::Contributor)
    }

    /// Exact match: is this an admin account
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role may author and submit posts.
    ///
    /// Admins retain contributor access so they can author posts of their
    /// own without holding two accounts.
    pub fn can_access_cms(&self) -> bool {
        matches!(self, Role::Contributor | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Reader => "reader",
            Role::Contributor => "contributor",
            Role::Admin => "admin",
        };
        write!(f, "{name}")
    }
}
