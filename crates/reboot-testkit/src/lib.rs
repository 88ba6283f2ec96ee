//! # Reboot Testkit
//!
//! Deterministic in-process implementations of every port the workflow
//! crates consume: `parking_lot`-locked in-memory stores with real
//! conditional-write semantics, a settable clock, a seeded entropy source,
//! and recording/failing notification senders.
//!
//! Nothing here is production code; it exists so every test in the
//! workspace runs without a network, a database, or a wall clock.

#![warn(missing_docs)]

pub mod clock;
pub mod entropy;
pub mod notify;
pub mod stores;

pub use clock::FixedClock;
pub use entropy::SeededEntropy;
pub use notify::{FailingSender, RecordingSender};
pub use stores::{
    MemoryApplicationStore, MemoryInvitationStore, MemoryPostStore, MemoryProfiles,
};
