use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use forum_repository::{
    CounterMode, ForumError, ForumService, ForumServiceConfig, ForumStore, InMemoryStore,
    RetryPolicy, StoreError,
};
use forum_shared::{Comment, NewComment, NewPost, Post, PostsPage, VerifiedIdentity, VoteRecord, VoteState};
use tokio::sync::Barrier;

/// In-memory store with call counting, failure injection and hooks to
/// interleave concurrent counter reads.
#[derive(Default)]
struct InstrumentedStore {
    inner: InMemoryStore,
    calls: AtomicUsize,
    /// Errors returned by the next `update_upvotes_count` calls, in order.
    counter_write_failures: Mutex<Vec<StoreError>>,
    /// When set, the first `parties` counter reads wait for each other.
    read_barrier: Option<(Arc<Barrier>, usize)>,
    reads: AtomicUsize,
    /// Simulated latency of every counter read.
    read_delay: Option<Duration>,
}

impl InstrumentedStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ForumStore for InstrumentedStore {
    async fn query_posts(&self, page_size: u32, cursor: Option<&str>) -> Result<PostsPage, StoreError> {
        self.touch();
        self.inner.query_posts(page_size, cursor).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        self.touch();
        self.inner.create_post(post).await
    }

    async fn retrieve_post(&self, post_id: &str) -> Result<Post, StoreError> {
        self.touch();
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some((barrier, parties)) = &self.read_barrier {
            if read < *parties {
                // Take the snapshot first so every party observes the same value.
                let post = self.inner.retrieve_post(post_id).await;
                barrier.wait().await;
                return post;
            }
        }
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.retrieve_post(post_id).await
    }

    async fn update_upvotes_count(&self, post_id: &str, count: u64) -> Result<(), StoreError> {
        self.touch();
        let injected = {
            let mut failures = self.counter_write_failures.lock().unwrap();
            if failures.is_empty() {
                None
            } else {
                Some(failures.remove(0))
            }
        };
        if let Some(error) = injected {
            return Err(error);
        }
        self.inner.update_upvotes_count(post_id, count).await
    }

    async fn query_comments(&self, post_id: &str, page_size: u32) -> Result<Vec<Comment>, StoreError> {
        self.touch();
        self.inner.query_comments(post_id, page_size).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        self.touch();
        self.inner.create_comment(comment).await
    }

    async fn find_active_votes(
        &self,
        post_id: &str,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<VoteRecord>, StoreError> {
        self.touch();
        self.inner.find_active_votes(post_id, user_id, limit).await
    }

    async fn create_vote(&self, post_id: &str, user_id: &str) -> Result<VoteRecord, StoreError> {
        self.touch();
        self.inner.create_vote(post_id, user_id).await
    }

    async fn archive_vote(&self, vote_id: &str) -> Result<(), StoreError> {
        self.touch();
        self.inner.archive_vote(vote_id).await
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(4, Duration::from_millis(10)).with_max_jitter(Duration::ZERO)
}

fn service_over(store: Arc<InstrumentedStore>, mode: CounterMode) -> ForumService {
    ForumService::with_config(
        store,
        ForumServiceConfig::default()
            .with_retry(fast_retry())
            .with_counter_mode(mode),
    )
}

#[tokio::test]
async fn test_first_toggle_upvotes_and_increments() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 5).await;
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);
    let alice = VerifiedIdentity::new("alice");

    let toggle = service.toggle_upvote(&post.id, Some(&alice)).await.unwrap();

    assert!(toggle.upvoted);
    assert_eq!(toggle.upvotes_count, 6);
    let votes = store.inner.votes_for(&post.id).await;
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].user_id, "alice");
    assert!(votes[0].is_active());
}

#[tokio::test]
async fn test_second_toggle_removes_vote_and_restores_count() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 5).await;
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);
    let alice = VerifiedIdentity::new("alice");

    service.toggle_upvote(&post.id, Some(&alice)).await.unwrap();
    let toggle = service.toggle_upvote(&post.id, Some(&alice)).await.unwrap();

    assert!(!toggle.upvoted);
    assert_eq!(toggle.upvotes_count, 5);

    let votes = store.inner.votes_for(&post.id).await;
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].state, VoteState::Archived);
}

#[tokio::test]
async fn test_third_toggle_creates_a_fresh_record() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 0).await;
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);
    let alice = VerifiedIdentity::new("alice");

    for _ in 0..3 {
        service.toggle_upvote(&post.id, Some(&alice)).await.unwrap();
    }

    let votes = store.inner.votes_for(&post.id).await;
    assert_eq!(votes.len(), 2);
    assert_eq!(votes.iter().filter(|v| v.is_active()).count(), 1);
    assert_eq!(store.inner.upvotes_of(&post.id).await, Some(1));
}

#[tokio::test]
async fn test_removing_a_vote_never_drives_the_counter_negative() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 0).await;
    store.inner.create_vote(&post.id, "alice").await.unwrap();
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    let toggle = service
        .toggle_upvote(&post.id, Some(&VerifiedIdentity::new("alice")))
        .await
        .unwrap();

    assert!(!toggle.upvoted);
    assert_eq!(toggle.upvotes_count, 0);
}

#[tokio::test]
async fn test_missing_post_id_fails_without_store_calls() {
    let store = Arc::new(InstrumentedStore::default());
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    let err = service
        .toggle_upvote("  ", Some(&VerifiedIdentity::new("alice")))
        .await
        .unwrap_err();

    assert!(matches!(err, ForumError::Validation(ref msg) if msg == "Missing postId"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_anonymous_caller_fails_without_store_calls() {
    let store = Arc::new(InstrumentedStore::default());
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    let err = service.toggle_upvote("post-1", None).await.unwrap_err();
    assert!(matches!(err, ForumError::Unauthorized(_)));

    let blank = VerifiedIdentity::new("");
    let err = service.toggle_upvote("post-1", Some(&blank)).await.unwrap_err();
    assert!(matches!(err, ForumError::Unauthorized(_)));

    assert_eq!(store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_counter_write_failures_are_retried() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 2).await;
    *store.counter_write_failures.lock().unwrap() = vec![
        StoreError::api(503, "service_unavailable", "busy"),
        StoreError::api(429, "rate_limited", "slow down"),
        StoreError::api(503, "service_unavailable", "busy"),
    ];
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    let toggle = service
        .toggle_upvote(&post.id, Some(&VerifiedIdentity::new("alice")))
        .await
        .unwrap();

    assert!(toggle.upvoted);
    assert_eq!(toggle.upvotes_count, 3);
}

#[tokio::test]
async fn test_counter_failure_after_vote_write_is_not_rolled_back() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 2).await;
    *store.counter_write_failures.lock().unwrap() =
        vec![StoreError::api(400, "validation_error", "bad number")];
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    let err = service
        .toggle_upvote(&post.id, Some(&VerifiedIdentity::new("alice")))
        .await
        .unwrap_err();

    assert!(matches!(err, ForumError::Operation(StoreError::Api { status: 400, .. })));
    let votes = store.inner.votes_for(&post.id).await;
    assert_eq!(votes.len(), 1);
    assert!(votes[0].is_active());
    assert_eq!(store.inner.upvotes_of(&post.id).await, Some(2));
}

#[tokio::test]
async fn test_concurrent_toggles_lose_an_update_in_read_modify_write_mode() {
    let barrier = Arc::new(Barrier::new(2));
    let store = Arc::new(InstrumentedStore {
        read_barrier: Some((barrier, 2)),
        ..Default::default()
    });
    let post = store.inner.seed_post("t", "c", 5).await;
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);
    let alice = VerifiedIdentity::new("alice");
    let bob = VerifiedIdentity::new("bob");

    let (a, b) = tokio::join!(
        service.toggle_upvote(&post.id, Some(&alice)),
        service.toggle_upvote(&post.id, Some(&bob)),
    );

    assert!(a.unwrap().upvoted);
    assert!(b.unwrap().upvoted);
    // Both adjustments read 5 and wrote 6; two active votes remain.
    assert_eq!(store.inner.upvotes_of(&post.id).await, Some(6));
    assert_eq!(store.inner.votes_for(&post.id).await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_serialized_mode_keeps_both_increments() {
    let store = Arc::new(InstrumentedStore {
        read_delay: Some(Duration::from_millis(50)),
        ..Default::default()
    });
    let post = store.inner.seed_post("t", "c", 5).await;
    let service = service_over(store.clone(), CounterMode::Serialized);
    let alice = VerifiedIdentity::new("alice");
    let bob = VerifiedIdentity::new("bob");

    let (a, b) = tokio::join!(
        service.toggle_upvote(&post.id, Some(&alice)),
        service.toggle_upvote(&post.id, Some(&bob)),
    );

    a.unwrap();
    b.unwrap();
    assert_eq!(store.inner.upvotes_of(&post.id).await, Some(7));
}

#[tokio::test]
async fn test_adjust_upvotes_returns_written_value() {
    let store = Arc::new(InstrumentedStore::default());
    let post = store.inner.seed_post("t", "c", 1).await;
    let service = service_over(store.clone(), CounterMode::ReadModifyWrite);

    assert_eq!(service.adjust_upvotes(&post.id, -1).await.unwrap(), 0);
    assert_eq!(service.adjust_upvotes(&post.id, -1).await.unwrap(), 0);
    assert_eq!(service.adjust_upvotes(&post.id, 1).await.unwrap(), 1);
}
