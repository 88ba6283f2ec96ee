//! In-memory store implementations
//!
//! Each store holds its rows behind a `parking_lot` lock and applies every
//! conditional write under that lock, so the CAS semantics the services
//! rely on are real: of two racing writers exactly one lands.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use reboot_core::{
    ActorId, ApplicationId, InvitationId, PostId, Profile, ProfileDirectory, RebootError, Result,
    Role, TimestampMs,
};
use reboot_invitation::{
    ApplicationStatus, ApplicationStore, ContributorApplication, Invitation, InvitationStore,
};
use reboot_moderation::{Post, PostEdits, PostStatus, PostStore, StatusPatch};

// =============================================================================
// Profiles
// =============================================================================

/// In-memory profile directory
#[derive(Debug, Default)]
pub struct MemoryProfiles {
    rows: RwLock<HashMap<ActorId, Profile>>,
}

impl MemoryProfiles {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile, returning its actor id
    pub fn add(&self, profile: Profile) -> ActorId {
        let id = profile.actor_id;
        self.rows.write().insert(id, profile);
        id
    }

    /// Convenience: seed a profile with the given role
    pub fn add_with_role(&self, email: &str, role: Role) -> Profile {
        let profile = Profile {
            actor_id: ActorId::new(),
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            role,
            verified: false,
        };
        self.add(profile.clone());
        profile
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn get(&self, actor_id: ActorId) -> Result<Profile> {
        self.rows
            .read()
            .get(&actor_id)
            .cloned()
            .ok_or_else(|| RebootError::not_found(format!("profile {actor_id}")))
    }

    async fn elevate_to_contributor(&self, actor_id: ActorId) -> Result<Profile> {
        let mut rows = self.rows.write();
        let profile = rows
            .get_mut(&actor_id)
            .ok_or_else(|| RebootError::not_found(format!("profile {actor_id}")))?;
        if profile.role.is_reader() {
            profile.role = Role::Contributor;
        }
        profile.verified = true;
        Ok(profile.clone())
    }
}

// =============================================================================
// Posts
// =============================================================================

/// In-memory post store with conditional transitions
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    rows: RwLock<HashMap<PostId, Post>>,
}

impl MemoryPostStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn get(&self, id: PostId) -> Result<Post> {
        self.rows
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RebootError::not_found(format!("post {id}")))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        Ok(self.rows.read().values().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, post: Post) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(&post.id) {
            return Err(RebootError::conflict(format!("post {} exists", post.id)));
        }
        if rows.values().any(|p| p.slug == post.slug) {
            return Err(RebootError::conflict(format!(
                "slug `{}` already in use",
                post.slug
            )));
        }
        rows.insert(post.id, post);
        Ok(())
    }

    async fn save_edits(
        &self,
        id: PostId,
        expected: PostStatus,
        edits: PostEdits,
        now_ms: TimestampMs,
    ) -> Result<Post> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RebootError::not_found(format!("post {id}")))?;
        if row.status != expected {
            return Err(RebootError::conflict(format!(
                "post is `{}`, expected `{expected}`",
                row.status
            )));
        }
        row.apply_edits(edits, now_ms);
        Ok(row.clone())
    }

    async fn transition(
        &self,
        id: PostId,
        expected: PostStatus,
        patch: StatusPatch,
        now_ms: TimestampMs,
    ) -> Result<Post> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RebootError::not_found(format!("post {id}")))?;
        if row.status != expected {
            return Err(RebootError::conflict(format!(
                "post is `{}`, expected `{expected}`",
                row.status
            )));
        }
        // Apply to a copy so a patch rejected by the domain rules leaves
        // the stored row untouched.
        let mut updated = row.clone();
        updated.apply_patch(&patch, now_ms)?;
        *row = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: PostId) -> Result<()> {
        self.rows
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RebootError::not_found(format!("post {id}")))
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .rows
            .read()
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.submitted_at_ms.unwrap_or(p.created_at_ms));
        Ok(posts)
    }

    async fn list_by_author(&self, author_id: ActorId) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .rows
            .read()
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse(p.updated_at_ms));
        Ok(posts)
    }
}

// =============================================================================
// Invitations
// =============================================================================

/// In-memory invitation store with single-use redemption
#[derive(Debug, Default)]
pub struct MemoryInvitationStore {
    rows: RwLock<HashMap<InvitationId, Invitation>>,
}

impl MemoryInvitationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl InvitationStore for MemoryInvitationStore {
    async fn get(&self, id: InvitationId) -> Result<Invitation> {
        self.rows
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RebootError::not_found(format!("invitation {id}")))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>> {
        Ok(self.rows.read().values().find(|i| i.code == code).cloned())
    }

    async fn insert(&self, invitation: Invitation) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(&invitation.id) {
            return Err(RebootError::conflict(format!(
                "invitation {} exists",
                invitation.id
            )));
        }
        if rows.values().any(|i| i.code == invitation.code) {
            return Err(RebootError::conflict("invite code already in use"));
        }
        rows.insert(invitation.id, invitation);
        Ok(())
    }

    async fn mark_used(
        &self,
        id: InvitationId,
        used_by: ActorId,
        used_at_ms: TimestampMs,
    ) -> Result<Invitation> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RebootError::not_found(format!("invitation {id}")))?;
        if row.used_at_ms.is_some() {
            return Err(RebootError::AlreadyUsed);
        }
        row.used_at_ms = Some(used_at_ms);
        row.used_by = Some(used_by);
        Ok(row.clone())
    }

    async fn clear_use(&self, id: InvitationId, used_by: ActorId) -> Result<Invitation> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RebootError::not_found(format!("invitation {id}")))?;
        if row.used_by != Some(used_by) {
            return Err(RebootError::conflict(
                "invitation was not redeemed by this actor",
            ));
        }
        row.used_at_ms = None;
        row.used_by = None;
        Ok(row.clone())
    }

    async fn delete(&self, id: InvitationId) -> Result<()> {
        self.rows
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RebootError::not_found(format!("invitation {id}")))
    }

    async fn list_by_inviter(&self, invited_by: ActorId) -> Result<Vec<Invitation>> {
        let mut invitations: Vec<Invitation> = self
            .rows
            .read()
            .values()
            .filter(|i| i.invited_by == invited_by)
            .cloned()
            .collect();
        invitations.sort_by_key(|i| std::cmp::Reverse(i.created_at_ms));
        Ok(invitations)
    }
}

// =============================================================================
// Applications
// =============================================================================

/// In-memory application store with one-shot decisions
#[derive(Debug, Default)]
pub struct MemoryApplicationStore {
    rows: RwLock<HashMap<ApplicationId, ContributorApplication>>,
}

impl MemoryApplicationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn get(&self, id: ApplicationId) -> Result<ContributorApplication> {
        self.rows
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RebootError::not_found(format!("application {id}")))
    }

    async fn insert(&self, application: ContributorApplication) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(&application.id) {
            return Err(RebootError::conflict(format!(
                "application {} exists",
                application.id
            )));
        }
        rows.insert(application.id, application);
        Ok(())
    }

    async fn decide(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        reviewed_by: ActorId,
        reviewed_at_ms: TimestampMs,
    ) -> Result<ContributorApplication> {
        if status == ApplicationStatus::Pending {
            return Err(RebootError::internal(
                "a decision cannot target `pending`",
            ));
        }
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RebootError::not_found(format!("application {id}")))?;
        if !row.is_pending() {
            return Err(RebootError::conflict(format!(
                "application is already `{}`",
                row.status
            )));
        }
        row.status = status;
        row.reviewed_by = Some(reviewed_by);
        row.reviewed_at_ms = Some(reviewed_at_ms);
        Ok(row.clone())
    }

    async fn list_pending(&self) -> Result<Vec<ContributorApplication>> {
        let mut apps: Vec<ContributorApplication> = self
            .rows
            .read()
            .values()
            .filter(|a| a.is_pending())
            .cloned()
            .collect();
        apps.sort_by_key(|a| a.created_at_ms);
        Ok(apps)
    }
}

// =============================================================================
// Tests
// =============================================================================
