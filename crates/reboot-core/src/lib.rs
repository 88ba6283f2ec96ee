//! # Reboot Core
//!
//! Foundation crate for the Reboot editorial workflow: identifier newtypes,
//! the role gate, the unified error type, effect ports for wall-clock time
//! and entropy, the profile directory port, and the bounded-retry helper.
//!
//! # Architecture
//!
//! This crate is pure domain foundation:
//! - No store implementations (the testkit provides in-memory ones)
//! - No notification transport (feature crates define those ports)
//! - Production effect handlers (`SystemClock`, `OsEntropy`) are the only
//!   I/O-touching code and are injected, never reached ambiently

#![warn(missing_docs)]

pub mod effects;
pub mod error;
pub mod identifiers;
pub mod profile;
pub mod retry;
pub mod role;

pub use effects::{ClockEffects, EntropyEffects, OsEntropy, SystemClock};
pub use error::{RebootError, Result};
pub use identifiers::{ActorId, ApplicationId, InvitationId, PostId};
pub use profile::{Profile, ProfileDirectory};
pub use retry::{with_retry, RetryPolicy};
pub use role::Role;

/// Milliseconds since the Unix epoch, the workspace-wide timestamp unit.
pub type TimestampMs = u64;
