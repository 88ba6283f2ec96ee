//! # Reboot Moderation
//!
//! The post moderation state machine: draft, pending approval, published,
//! rejected, and the admin decision flow between them.
//!
//! # Architecture
//!
//! 1. The caller authenticates and fetches the acting `Profile`
//! 2. `PostLifecycle` checks the role gate and validates inputs, before any
//!    store access
//! 3. The state transition is a conditional (CAS) write through the
//!    `PostStore` port; a lost race surfaces as `Conflict`
//! 4. The moderation notification runs after the commit, best-effort; a
//!    delivery failure is logged and never rolls the transition back

#![warn(missing_docs)]

pub mod lifecycle;
pub mod notify;
pub mod post;
pub mod store;

pub use lifecycle::{Decision, LifecycleConfig, PostLifecycle};
pub use notify::{dispatch_decision_notice, ModerationNotice, NotificationSender};
pub use post::{slugify, NewPost, Post, PostEdits, PostStatus, StatusPatch};
pub use store::PostStore;
