//! End-to-end moderation flow over the in-memory testkit ports.

use std::sync::Arc;

use reboot_core::{Profile, RebootError, Role};
use reboot_moderation::{
    Decision, LifecycleConfig, NewPost, NotificationSender, PostEdits, PostLifecycle, PostStatus,
    PostStore,
};
use reboot_testkit::{FailingSender, FixedClock, MemoryPostStore, MemoryProfiles, RecordingSender};

struct Fixture {
    lifecycle: PostLifecycle,
    posts: Arc<MemoryPostStore>,
    clock: Arc<FixedClock>,
    recorder: Arc<RecordingSender>,
    author: Profile,
    admin: Profile,
    reader: Profile,
}

fn fixture_with_sender(sender: Arc<dyn NotificationSender>) -> Fixture {
    let posts = Arc::new(MemoryPostStore::new());
    let profiles = Arc::new(MemoryProfiles::new());
    let clock = Arc::new(FixedClock::at(1_000));
    let recorder = Arc::new(RecordingSender::new());

    let author = profiles.add_with_role("author@example.com", Role::Contributor);
    let admin = profiles.add_with_role("admin@example.com", Role::Admin);
    let reader = profiles.add_with_role("reader@example.com", Role::Reader);

    let lifecycle = PostLifecycle::new(
        posts.clone(),
        profiles,
        sender,
        clock.clone(),
        LifecycleConfig::default(),
    );

    Fixture {
        lifecycle,
        posts,
        clock,
        recorder,
        author,
        admin,
        reader,
    }
}

fn fixture() -> Fixture {
    let recorder = Arc::new(RecordingSender::new());
    let mut fx = fixture_with_sender(recorder.clone());
    fx.recorder = recorder;
    fx
}

fn sample_post() -> NewPost {
    NewPost {
        title: "Why Brand Voice Matters".to_string(),
        slug: None,
        excerpt: "A short case for consistency".to_string(),
        content: "{\"blocks\":[{\"type\":\"paragraph\",\"text\":\"...\"}]}".to_string(),
        topic: Some("branding".to_string()),
    }
}

#[tokio::test]
async fn approval_flow_publishes_and_notifies() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    assert_eq!(draft.status, PostStatus::Draft);

    fx.clock.advance(500);
    let pending = fx
        .lifecycle
        .submit_for_approval(&fx.author, draft.id, Some("ready for review".to_string()))
        .await
        .unwrap();
    assert_eq!(pending.status, PostStatus::PendingApproval);
    assert_eq!(pending.submitted_at_ms, Some(1_500));

    let queue = fx.lifecycle.pending_queue(&fx.admin).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, draft.id);

    fx.clock.advance(500);
    let published = fx
        .lifecycle
        .decide(
            &fx.admin,
            draft.id,
            Decision::Approve,
            Some("Great work".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(published.status, PostStatus::Published);
    assert!(published.published);
    assert_eq!(published.reviewer_id, Some(fx.admin.actor_id));
    assert_eq!(published.reviewed_at_ms, Some(2_000));
    assert_eq!(published.reviewer_notes.as_deref(), Some("Great work"));
    published.check_invariants().unwrap();

    let sent = fx.recorder.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].approved);
    assert_eq!(sent[0].recipient_email, "author@example.com");
    assert_eq!(sent[0].reviewer_notes.as_deref(), Some("Great work"));
}

#[tokio::test]
async fn rejection_requires_notes_and_writes_nothing() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();

    let err = fx
        .lifecycle
        .decide(&fx.admin, draft.id, Decision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::Validation { ref field, .. } if field == "reviewer_notes"));

    // Whitespace-only notes are empty notes.
    let err = fx
        .lifecycle
        .decide(&fx.admin, draft.id, Decision::Reject, Some("   ".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::Validation { .. }));

    let row = fx.posts.get(draft.id).await.unwrap();
    assert_eq!(row.status, PostStatus::PendingApproval);
    assert!(row.reviewer_id.is_none());
    assert!(fx.recorder.sent().is_empty());
}

#[tokio::test]
async fn non_admin_cannot_decide() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();

    for actor in [&fx.author, &fx.reader] {
        let err = fx
            .lifecycle
            .decide(actor, draft.id, Decision::Approve, Some("ok".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, RebootError::PermissionDenied { .. }));
    }
    let row = fx.posts.get(draft.id).await.unwrap();
    assert_eq!(row.status, PostStatus::PendingApproval);
}

#[tokio::test]
async fn reader_cannot_create_or_submit() {
    let fx = fixture();
    let err = fx
        .lifecycle
        .create_draft(&fx.reader, sample_post())
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::PermissionDenied { .. }));
    assert!(fx.posts.is_empty());
}

#[tokio::test]
async fn notification_failure_never_rolls_back_the_decision() {
    let failing = Arc::new(FailingSender::new());
    let fx = fixture_with_sender(failing.clone());
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();

    let published = fx
        .lifecycle
        .decide(&fx.admin, draft.id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(published.status, PostStatus::Published);
    assert_eq!(failing.attempts(), 1);

    let row = fx.posts.get(draft.id).await.unwrap();
    assert!(row.published);
}

#[tokio::test]
async fn racing_decisions_leave_exactly_one_on_the_row() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();

    let approve = fx
        .lifecycle
        .decide(&fx.admin, draft.id, Decision::Approve, None);
    let reject = fx.lifecycle.decide(
        &fx.admin,
        draft.id,
        Decision::Reject,
        Some("duplicate submission".to_string()),
    );
    let (a, b) = tokio::join!(approve, reject);

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(RebootError::Conflict { .. })));

    let row = fx.posts.get(draft.id).await.unwrap();
    row.check_invariants().unwrap();
    assert!(matches!(
        row.status,
        PostStatus::Published | PostStatus::Rejected
    ));
}

#[tokio::test]
async fn rejected_post_can_be_edited_and_resubmitted() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();
    fx.lifecycle
        .decide(
            &fx.admin,
            draft.id,
            Decision::Reject,
            Some("needs sources".to_string()),
        )
        .await
        .unwrap();

    // The author revises the rejected post.
    let edited = fx
        .lifecycle
        .autosave(
            &fx.author,
            draft.id,
            PostEdits {
                content: Some("{\"blocks\":[{\"type\":\"quote\"}]}".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.status, PostStatus::Rejected);

    let resubmitted = fx
        .lifecycle
        .submit_for_approval(&fx.author, draft.id, Some("added sources".to_string()))
        .await
        .unwrap();
    assert_eq!(resubmitted.status, PostStatus::PendingApproval);
    // The previous decision stays visible to reviewers.
    assert_eq!(resubmitted.reviewer_notes.as_deref(), Some("needs sources"));
    assert_eq!(resubmitted.reviewer_id, Some(fx.admin.actor_id));
}

#[tokio::test]
async fn pending_posts_cannot_be_edited_or_deleted() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap();

    // Both refusals are state mismatches, not role failures.
    let err = fx
        .lifecycle
        .autosave(&fx.author, draft.id, PostEdits::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::Conflict { .. }));

    let err = fx
        .lifecycle
        .delete_draft(&fx.author, draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::Conflict { .. }));
}

#[tokio::test]
async fn author_can_delete_a_draft() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle.delete_draft(&fx.author, draft.id).await.unwrap();
    assert!(fx.posts.is_empty());
}

#[tokio::test]
async fn submitting_requires_complete_fields() {
    let fx = fixture();
    let draft = fx
        .lifecycle
        .create_draft(
            &fx.author,
            NewPost {
                topic: None,
                ..sample_post()
            },
        )
        .await
        .unwrap();

    let err = fx
        .lifecycle
        .submit_for_approval(&fx.author, draft.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RebootError::Validation { ref field, .. } if field == "topic"));
    let row = fx.posts.get(draft.id).await.unwrap();
    assert_eq!(row.status, PostStatus::Draft);
}

#[tokio::test]
async fn my_posts_lists_only_the_authors_rows() {
    let fx = fixture();
    fx.lifecycle
        .create_draft(&fx.author, sample_post())
        .await
        .unwrap();
    fx.lifecycle
        .create_draft(
            &fx.admin,
            NewPost {
                title: "Editor picks".to_string(),
                slug: Some("editor-picks".to_string()),
                ..sample_post()
            },
        )
        .await
        .unwrap();

    let mine = fx.lifecycle.my_posts(&fx.author).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].author_id, fx.author.actor_id);
}
