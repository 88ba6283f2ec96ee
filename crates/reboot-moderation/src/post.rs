//! Post record, status machine, and slug rules

use reboot_core::{ActorId, PostId, RebootError, Result, TimestampMs};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Status
// =============================================================================

/// Moderation status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Being written; visible only to the author
    Draft,
    /// Submitted and waiting in the admin review queue
    PendingApproval,
    /// Approved and publicly visible
    Published,
    /// Declined with reviewer notes; the author may edit and resubmit
    Rejected,
}

impl PostStatus {
    /// Whether the author may edit content in this state
    pub fn author_may_edit(&self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::Rejected)
    }

    /// Whether the post is waiting on an admin decision
    pub fn is_awaiting_review(&self) -> bool {
        matches!(self, PostStatus::PendingApproval)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PostStatus::Draft => "draft",
            PostStatus::PendingApproval => "pending_approval",
            PostStatus::Published => "published",
            PostStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Records
// =============================================================================

/// Input for creating a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    /// Post title
    pub title: String,
    /// Explicit slug; derived from the title when `None`
    pub slug: Option<String>,
    /// Short teaser shown on listing pages
    pub excerpt: String,
    /// Serialized block sequence, opaque to this core
    pub content: String,
    /// Topic/category selection
    pub topic: Option<String>,
}

/// Author edits applied during autosave
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEdits {
    /// Replacement title, if changed
    pub title: Option<String>,
    /// Replacement excerpt, if changed
    pub excerpt: Option<String>,
    /// Replacement content blob, if changed
    pub content: Option<String>,
    /// Replacement topic, if changed
    pub topic: Option<String>,
}

/// A post moving through the moderation lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Row identifier
    pub id: PostId,
    /// Post title
    pub title: String,
    /// Unique URL-safe slug
    pub slug: String,
    /// Short teaser shown on listing pages
    pub excerpt: String,
    /// Serialized block sequence, opaque to this core
    pub content: String,
    /// Topic/category; required before submission
    pub topic: Option<String>,
    /// Current moderation status
    pub status: PostStatus,
    /// Persisted visibility flag; true iff `status == Published`
    pub published: bool,
    /// Authoring actor
    pub author_id: ActorId,
    /// Admin who made the last decision, if any
    pub reviewer_id: Option<ActorId>,
    /// Notes from the last decision; required on rejection
    pub reviewer_notes: Option<String>,
    /// Notes the author attached at submission
    pub submission_notes: Option<String>,
    /// When the post was last submitted for review
    pub submitted_at_ms: Option<TimestampMs>,
    /// When the last decision was made
    pub reviewed_at_ms: Option<TimestampMs>,
    /// Creation time
    pub created_at_ms: TimestampMs,
    /// Last mutation time
    pub updated_at_ms: TimestampMs,
}

// =============================================================================
// Status patches (CAS payloads)
// =============================================================================

/// The write applied by a conditional status transition.
///
/// Stores apply a patch under their own atomicity guarantee after checking
/// the expected current status, so two admins deciding the same post leave
/// exactly one decision on the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatusPatch {
    /// Author submission into the review queue
    Submitted {
        /// Submission time
        submitted_at_ms: TimestampMs,
        /// Optional note to the reviewers
        submission_notes: Option<String>,
    },
    /// Admin decision out of the review queue
    Decided {
        /// `Published` or `Rejected`
        status: PostStatus,
        /// Deciding admin
        reviewer_id: ActorId,
        /// Decision time
        reviewed_at_ms: TimestampMs,
        /// Reviewer notes; present whenever `status == Rejected`
        reviewer_notes: Option<String>,
    },
}

impl Post {
    /// Build a fresh draft from creation input
    pub fn new_draft(input: NewPost, author_id: ActorId, now_ms: TimestampMs) -> Result<Self> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(RebootError::validation("title", "must not be empty"));
        }
        let slug = match input.slug {
            Some(slug) => slug,
            None => slugify(&title),
        };
        validate_slug(&slug)?;

        Ok(Self {
            id: PostId::new(),
            title,
            slug,
            excerpt: input.excerpt,
            content: input.content,
            topic: input.topic,
            status: PostStatus::Draft,
            published: false,
            author_id,
            reviewer_id: None,
            reviewer_notes: None,
            submission_notes: None,
            submitted_at_ms: None,
            reviewed_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }

    /// Apply author edits in place, bumping `updated_at_ms` only
    pub fn apply_edits(&mut self, edits: PostEdits, now_ms: TimestampMs) {
        if let Some(title) = edits.title {
            self.title = title;
        }
        if let Some(excerpt) = edits.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = edits.content {
            self.content = content;
        }
        if let Some(topic) = edits.topic {
            self.topic = Some(topic);
        }
        self.updated_at_ms = now_ms;
    }

    /// Apply a status patch in place.
    ///
    /// Prior reviewer fields are retained across a resubmission so admins
    /// still see the last decision; the next decision overwrites them.
    pub fn apply_patch(&mut self, patch: &StatusPatch, now_ms: TimestampMs) -> Result<()> {
        match patch {
            StatusPatch::Submitted {
                submitted_at_ms,
                submission_notes,
            } => {
                self.status = PostStatus::PendingApproval;
                self.published = false;
                self.submitted_at_ms = Some(*submitted_at_ms);
                self.submission_notes = submission_notes.clone();
            }
            StatusPatch::Decided {
                status,
                reviewer_id,
                reviewed_at_ms,
                reviewer_notes,
            } => {
                match status {
                    PostStatus::Published => self.published = true,
                    PostStatus::Rejected => {
                        if reviewer_notes.as_deref().is_none_or_empty() {
                            return Err(RebootError::validation(
                                "reviewer_notes",
                                "required when rejecting",
                            ));
                        }
                        self.published = false;
                    }
                    other => {
                        return Err(RebootError::internal(format!(
                            "decision cannot target status `{other}`"
                        )));
                    }
                }
                self.status = *status;
                self.reviewer_id = Some(*reviewer_id);
                self.reviewed_at_ms = Some(*reviewed_at_ms);
                self.reviewer_notes = reviewer_notes.clone();
            }
        }
        self.updated_at_ms = now_ms;
        self.check_invariants()
    }

    /// Validate the fields required before submission for review
    pub fn validate_for_submission(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(RebootError::validation("title", "must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(RebootError::validation("content", "must not be empty"));
        }
        if self.topic.as_deref().is_none_or_empty() {
            return Err(RebootError::validation("topic", "a topic must be selected"));
        }
        Ok(())
    }

    /// Verify the record-level invariants.
    ///
    /// `published` mirrors `status == Published`, and the reviewer id and
    /// timestamp are set or unset together.
    pub fn check_invariants(&self) -> Result<()> {
        if self.published != (self.status == PostStatus::Published) {
            return Err(RebootError::internal(format!(
                "published flag {} disagrees with status `{}`",
                self.published, self.status
            )));
        }
        if self.reviewer_id.is_some() != self.reviewed_at_ms.is_some() {
            return Err(RebootError::internal(
                "reviewer_id and reviewed_at_ms must be set together",
            ));
        }
        Ok(())
    }
}

trait OptionStrExt {
    fn is_none_or_empty(&self) -> bool;
}

impl OptionStrExt for Option<&str> {
    fn is_none_or_empty(&self) -> bool {
        self.map(|s| s.trim().is_empty()).unwrap_or(true)
    }
}

// =============================================================================
// Slugs
// =============================================================================

/// Derive a URL-safe slug from a title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true; // suppress a leading hyphen
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Validate an explicit slug against the slug rules
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(RebootError::validation("slug", "must not be empty"));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(RebootError::validation(
            "slug",
            "hyphens may only separate words",
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(RebootError::validation(
            "slug",
            "only lowercase letters, digits, and hyphens are allowed",
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(test)]
mod invariant_props {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Submit,
        Approve,
        Reject(String),
        Edit,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Submit),
            Just(Step::Approve),
            Just(Step::Reject("needs work".to_string())),
            Just(Step::Edit),
        ]
    }

    proptest! {
        // Any sequence of legal transitions preserves the published flag
        // and reviewer-field pairing invariants.
        #[test]
        fn lifecycle_invariants_hold(steps in proptest::collection::vec(step_strategy(), 1..40)) {
            let author = ActorId::new();
            let reviewer = ActorId::new();
            let mut post = Post::new_draft(
                NewPost {
                    title: "Prop".to_string(),
                    slug: None,
                    excerpt: String::new(),
                    content: "body".to_string(),
                    topic: Some("general".to_string()),
                },
                author,
                0,
            ).unwrap();

            let mut now = 1u64;
            for step in steps {
                now += 1;
                match step {
                    Step::Submit if post.status.author_may_edit() => {
                        post.apply_patch(&StatusPatch::Submitted {
                            submitted_at_ms: now,
                            submission_notes: None,
                        }, now).unwrap();
                    }
                    Step::Approve if post.status.is_awaiting_review() => {
                        post.apply_patch(&StatusPatch::Decided {
                            status: PostStatus::Published,
                            reviewer_id: reviewer,
                            reviewed_at_ms: now,
                            reviewer_notes: None,
                        }, now).unwrap();
                    }
                    Step::Reject(notes) if post.status.is_awaiting_review() => {
                        post.apply_patch(&StatusPatch::Decided {
                            status: PostStatus::Rejected,
                            reviewer_id: reviewer,
                            reviewed_at_ms: now,
                            reviewer_notes: Some(notes),
                        }, now).unwrap();
                    }
                    Step::Edit if post.status.author_may_edit() => {
                        post.apply_edits(PostEdits {
                            content: Some("edited".to_string()),
                            ..Default::default()
                        }, now);
                    }
                    // Step not legal from the current status; skip.
                    _ => {}
                }
                prop_assert!(post.check_invariants().is_ok());
                prop_assert_eq!(post.published, post.status == PostStatus::Published);
            }
        }
    }
}
