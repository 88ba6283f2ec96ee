//! Unified error type for Reboot operations
//!
//! A single closed enum covers every failure the workflow core can surface
//! to a caller. Validation and permission failures carry enough context for
//! inline user-facing display; invitation failures stay distinguishable
//! (`NotFound` vs `Expired` vs `AlreadyUsed`) rather than collapsing into a
//! generic "invalid invite" message.

use serde::{Deserialize, Serialize};

use crate::TimestampMs;

/// Unified error type for all Reboot workflow operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RebootError {
    /// Actor lacks the role or ownership required for the operation
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// What privilege was missing
        message: String,
    },

    /// A required field is missing or malformed
    #[error("Validation failed for `{field}`: {message}")]
    Validation {
        /// The offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Referenced entity or invite code does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Invitation past its expiry window
    #[error("Invitation expired at {expired_at_ms}ms")]
    Expired {
        /// When the invitation expired (ms since epoch)
        expired_at_ms: TimestampMs,
    },

    /// Invitation already redeemed
    #[error("Invitation already used")]
    AlreadyUsed,

    /// A concurrent state transition won the race
    #[error("Conflict: {message}")]
    Conflict {
        /// Which transition lost and why
        message: String,
    },

    /// Downstream store or notifier did not answer in time
    #[error("Timeout during {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
    },

    /// Downstream store or notifier unreachable
    #[error("Unavailable: {message}")]
    Unavailable {
        /// What was unreachable
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// What failed to (de)serialize
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violation
        message: String,
    },
}

impl RebootError {
    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an expired-invitation error
    pub fn expired(expired_at_ms: TimestampMs) -> Self {
        Self::Expired { expired_at_ms }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a bounded retry may resolve this error.
    ///
    /// Only transport-class failures qualify. `Conflict` requires the caller
    /// to re-read current state first, and validation/permission failures
    /// will never succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }
}

impl From<serde_json::Error> for RebootError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Standard Result type for Reboot operations
pub type Result<T> = std::result::Result<T, RebootError>;
