//! Lifecycle engine tests over the in-memory store.
//!
//! Covers creation, ownership-checked soft deletion, the topic `post_count`
//! aggregate (including under concurrency), and comment threading rules.

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use forum_core::entities::{
    Comment, NewComment, NewPost, NewTopic, NewUser, Post, Topic, User,
};
use forum_core::error::CoreError;
use forum_core::lifecycle::ForumService;
use forum_core::memory::MemoryStore;
use forum_core::search::{SearchRequest, SearchScope};
use forum_core::status::ContentStatus;
use forum_core::store::{ForumStore, ListFilter, StoreError, StoreResult};
use forum_core::types::DbId;
use tokio::sync::{mpsc, Notify};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn service() -> ForumService {
    ForumService::new(Arc::new(MemoryStore::new()))
}

fn new_topic(name: &str) -> NewTopic {
    NewTopic {
        name: name.to_string(),
        description: format!("All about {name}"),
    }
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        body: format!("{title} body"),
    }
}

fn comment(body: &str, parent_id: Option<DbId>) -> NewComment {
    NewComment {
        body: body.to_string(),
        parent_id,
    }
}

async fn user(forum: &ForumService, name: &str) -> DbId {
    forum.login(name).await.unwrap().id
}

async fn post_count(forum: &ForumService, topic_id: DbId) -> i64 {
    forum.get_topic(topic_id).await.unwrap().post_count
}

// ---------------------------------------------------------------------------
// Topics and posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_count_follows_creates_and_deletes() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let u2 = user(&forum, "u2").await;

    let t1 = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    assert_eq!(t1.post_count, 0);
    assert_eq!(t1.status, ContentStatus::Active);

    let p1 = forum.create_post(u1, t1.id, &new_post("P1")).await.unwrap();
    forum.create_post(u1, t1.id, &new_post("P2")).await.unwrap();
    assert_eq!(post_count(&forum, t1.id).await, 2);

    assert_matches!(
        forum.delete_post(u2, p1.id).await,
        Err(CoreError::Forbidden(_))
    );
    assert_eq!(post_count(&forum, t1.id).await, 2);

    let removed = forum.delete_post(u1, p1.id).await.unwrap();
    assert_eq!(removed.status, ContentStatus::Removed);
    assert_eq!(post_count(&forum, t1.id).await, 1);

    assert_matches!(
        forum.delete_post(u1, p1.id).await,
        Err(CoreError::AlreadyRemoved { entity: "Post", .. })
    );
    assert_eq!(post_count(&forum, t1.id).await, 1);
}

#[tokio::test]
async fn removed_post_is_still_readable_but_hidden_from_listings() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Go")).await.unwrap();
    let p1 = forum.create_post(u1, topic.id, &new_post("P1")).await.unwrap();
    let p2 = forum.create_post(u1, topic.id, &new_post("P2")).await.unwrap();

    forum.delete_post(u1, p1.id).await.unwrap();

    let fetched = forum.get_post(p1.id).await.unwrap();
    assert_eq!(fetched.status, ContentStatus::Removed);

    let listed = forum
        .search_posts(SearchScope::Topic(topic.id), &SearchRequest::all())
        .await
        .unwrap();
    assert_eq!(ids(&listed), vec![p2.id]);

    let with_removed = SearchRequest {
        include_removed: true,
        ..SearchRequest::all()
    };
    let listed = forum
        .search_posts(SearchScope::Topic(topic.id), &with_removed)
        .await
        .unwrap();
    assert_eq!(ids(&listed), vec![p2.id, p1.id]);
}

#[tokio::test]
async fn delete_checks_existence_before_ownership() {
    let forum = service();
    let u1 = user(&forum, "u1").await;

    assert_matches!(
        forum.delete_post(u1, 999).await,
        Err(CoreError::NotFound { entity: "Post", id: 999 })
    );
    assert_matches!(
        forum.delete_topic(u1, 999).await,
        Err(CoreError::NotFound { entity: "Topic", .. })
    );
    assert_matches!(
        forum.delete_comment(u1, 999).await,
        Err(CoreError::NotFound { entity: "Comment", .. })
    );
}

#[tokio::test]
async fn removed_resource_reports_already_removed_to_anyone() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let u2 = user(&forum, "u2").await;
    let topic = forum.create_topic(u1, &new_topic("Zig")).await.unwrap();

    forum.delete_topic(u1, topic.id).await.unwrap();

    assert_matches!(
        forum.delete_topic(u2, topic.id).await,
        Err(CoreError::AlreadyRemoved { entity: "Topic", .. })
    );
}

#[tokio::test]
async fn removing_a_topic_keeps_its_posts() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("C")).await.unwrap();
    let post = forum.create_post(u1, topic.id, &new_post("pointers")).await.unwrap();

    let removed = forum.delete_topic(u1, topic.id).await.unwrap();
    assert_eq!(removed.status, ContentStatus::Removed);
    assert_eq!(removed.post_count, 1);

    let still_there = forum.get_post(post.id).await.unwrap();
    assert_eq!(still_there.status, ContentStatus::Active);
}

#[tokio::test]
async fn posting_requires_an_active_topic() {
    let forum = service();
    let u1 = user(&forum, "u1").await;

    assert_matches!(
        forum.create_post(u1, 42, &new_post("orphan")).await,
        Err(CoreError::ParentNotFound { entity: "Topic", id: 42 })
    );

    let topic = forum.create_topic(u1, &new_topic("Closed")).await.unwrap();
    forum.delete_topic(u1, topic.id).await.unwrap();
    assert_matches!(
        forum.create_post(u1, topic.id, &new_post("late")).await,
        Err(CoreError::ParentNotFound { entity: "Topic", .. })
    );
    assert_eq!(post_count(&forum, topic.id).await, 0);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let forum = service();
    let u1 = user(&forum, "u1").await;

    assert_matches!(
        forum
            .create_topic(
                u1,
                &NewTopic {
                    name: "".into(),
                    description: "x".into()
                }
            )
            .await,
        Err(CoreError::Validation(_))
    );
    assert!(forum.search_topics(&SearchRequest::all()).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comments_list_in_thread_order() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    let post = forum.create_post(u1, topic.id, &new_post("Lifetimes")).await.unwrap();

    let c1 = forum.create_comment(u1, post.id, &comment("first", None)).await.unwrap();
    let c2 = forum
        .create_comment(u1, post.id, &comment("reply", Some(c1.id)))
        .await
        .unwrap();
    assert_eq!(c2.parent_id, Some(c1.id));

    let listed = forum.list_comments(post.id).await.unwrap();
    assert_eq!(
        listed.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![c1.id, c2.id]
    );
}

#[tokio::test]
async fn replies_nest_only_one_level() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    let post = forum.create_post(u1, topic.id, &new_post("Traits")).await.unwrap();
    let c1 = forum.create_comment(u1, post.id, &comment("top", None)).await.unwrap();
    let c2 = forum
        .create_comment(u1, post.id, &comment("reply", Some(c1.id)))
        .await
        .unwrap();

    assert_matches!(
        forum
            .create_comment(u1, post.id, &comment("too deep", Some(c2.id)))
            .await,
        Err(CoreError::Validation(_))
    );
}

#[tokio::test]
async fn reply_parent_must_be_on_the_same_post() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    let p1 = forum.create_post(u1, topic.id, &new_post("A")).await.unwrap();
    let p2 = forum.create_post(u1, topic.id, &new_post("B")).await.unwrap();
    let on_p1 = forum.create_comment(u1, p1.id, &comment("hi", None)).await.unwrap();

    assert_matches!(
        forum
            .create_comment(u1, p2.id, &comment("cross", Some(on_p1.id)))
            .await,
        Err(CoreError::ParentNotFound { entity: "Comment", .. })
    );
    assert_matches!(
        forum.create_comment(u1, p2.id, &comment("ghost", Some(777))).await,
        Err(CoreError::ParentNotFound { entity: "Comment", id: 777 })
    );
}

#[tokio::test]
async fn commenting_on_a_removed_post_is_rejected() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    let post = forum.create_post(u1, topic.id, &new_post("Gone")).await.unwrap();
    forum.delete_post(u1, post.id).await.unwrap();

    assert_matches!(
        forum.create_comment(u1, post.id, &comment("late", None)).await,
        Err(CoreError::ParentNotFound { entity: "Post", .. })
    );
}

#[tokio::test]
async fn removed_comments_stay_in_the_thread() {
    let forum = service();
    let u1 = user(&forum, "u1").await;
    let u2 = user(&forum, "u2").await;
    let topic = forum.create_topic(u1, &new_topic("Rust")).await.unwrap();
    let post = forum.create_post(u1, topic.id, &new_post("Macros")).await.unwrap();
    let c1 = forum.create_comment(u2, post.id, &comment("oops", None)).await.unwrap();

    assert_matches!(
        forum.delete_comment(u1, c1.id).await,
        Err(CoreError::Forbidden(_))
    );
    forum.delete_comment(u2, c1.id).await.unwrap();

    let listed = forum.list_comments(post.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ContentStatus::Removed);
}

#[tokio::test]
async fn listing_comments_of_a_missing_post_is_not_found() {
    let forum = service();
    assert_matches!(
        forum.list_comments(5).await,
        Err(CoreError::NotFound { entity: "Post", id: 5 })
    );
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_finds_or_creates() {
    let forum = service();
    let first = forum.login("alice").await.unwrap();
    let second = forum.login("  alice ").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.bio, "");
}

#[tokio::test]
async fn register_rejects_taken_username() {
    let forum = service();
    let input = NewUser {
        username: "bob".into(),
        bio: Some("hello".into()),
    };
    let bob = forum.register_user(&input).await.unwrap();
    assert_eq!(bob.bio, "hello");

    assert_matches!(forum.register_user(&input).await, Err(CoreError::Conflict(_)));
    assert_eq!(forum.get_user(bob.id).await.unwrap().username, "bob");
    assert_matches!(
        forum.get_user(bob.id + 100).await,
        Err(CoreError::NotFound { entity: "User", .. })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_logins_resolve_to_one_user() {
    let forum = service();
    let tasks = (0..16).map(|_| {
        let forum = forum.clone();
        tokio::spawn(async move { forum.login("carol").await.unwrap().id })
    });
    let ids: Vec<DbId> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}

// ---------------------------------------------------------------------------
// Concurrency of the post_count aggregate
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_and_deletes_keep_post_count_exact() {
    const CREATES: usize = 40;
    const DELETES: usize = 15;

    let forum = service();
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Busy")).await.unwrap();

    let creates = (0..CREATES).map(|i| {
        let forum = forum.clone();
        tokio::spawn(async move {
            forum
                .create_post(u1, topic.id, &new_post(&format!("post {i}")))
                .await
                .unwrap()
                .id
        })
    });
    let post_ids: Vec<DbId> = futures::future::join_all(creates)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(post_count(&forum, topic.id).await, CREATES as i64);

    // Each victim is deleted twice at once; exactly one of the pair wins.
    let deletes = post_ids
        .iter()
        .take(DELETES)
        .flat_map(|&id| [id, id])
        .map(|id| {
            let forum = forum.clone();
            tokio::spawn(async move { forum.delete_post(u1, id).await })
        });
    let results = futures::future::join_all(deletes).await;
    let succeeded = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(succeeded, DELETES);
    assert!(results.iter().all(|r| matches!(
        r,
        Ok(Ok(_)) | Ok(Err(CoreError::AlreadyRemoved { .. }))
    )));

    assert_eq!(
        post_count(&forum, topic.id).await,
        (CREATES - DELETES) as i64
    );
}

// ---------------------------------------------------------------------------
// Counter failures and slow writes
// ---------------------------------------------------------------------------

/// Pauses `create_post` after the insert has committed, before the call
/// returns to the service.
struct PostInsertHold {
    inserted: mpsc::UnboundedSender<DbId>,
    release: Arc<Notify>,
}

/// Delegates to a [`MemoryStore`], optionally failing every counter
/// adjustment or holding post inserts.
#[derive(Default)]
struct HookedStore {
    inner: MemoryStore,
    counter_offline: bool,
    hold_post_insert: Option<PostInsertHold>,
}

#[async_trait]
impl ForumStore for HookedStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
    async fn create_user(&self, username: &str, bio: &str) -> StoreResult<User> {
        self.inner.create_user(username, bio).await
    }
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        self.inner.find_user(id).await
    }
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_username(username).await
    }
    async fn create_topic(&self, created_by: DbId, input: &NewTopic) -> StoreResult<Topic> {
        self.inner.create_topic(created_by, input).await
    }
    async fn find_topic(&self, id: DbId) -> StoreResult<Option<Topic>> {
        self.inner.find_topic(id).await
    }
    async fn list_topics(&self, filter: &ListFilter) -> StoreResult<Vec<Topic>> {
        self.inner.list_topics(filter).await
    }
    async fn remove_topic(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        self.inner.remove_topic(id, created_by).await
    }
    async fn adjust_post_count(&self, topic_id: DbId, delta: i64) -> StoreResult<bool> {
        if self.counter_offline {
            return Err(StoreError::Unavailable("counter offline".into()));
        }
        self.inner.adjust_post_count(topic_id, delta).await
    }
    async fn create_post(
        &self,
        topic_id: DbId,
        created_by: DbId,
        input: &NewPost,
    ) -> StoreResult<Post> {
        let post = self.inner.create_post(topic_id, created_by, input).await?;
        if let Some(hold) = &self.hold_post_insert {
            hold.inserted.send(post.id).unwrap();
            hold.release.notified().await;
        }
        Ok(post)
    }
    async fn find_post(&self, id: DbId) -> StoreResult<Option<Post>> {
        self.inner.find_post(id).await
    }
    async fn list_posts(
        &self,
        topic_id: Option<DbId>,
        filter: &ListFilter,
    ) -> StoreResult<Vec<Post>> {
        self.inner.list_posts(topic_id, filter).await
    }
    async fn remove_post(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        self.inner.remove_post(id, created_by).await
    }
    async fn create_comment(
        &self,
        post_id: DbId,
        commented_by: DbId,
        input: &NewComment,
    ) -> StoreResult<Comment> {
        self.inner.create_comment(post_id, commented_by, input).await
    }
    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        self.inner.find_comment(id).await
    }
    async fn list_comments(&self, post_id: DbId) -> StoreResult<Vec<Comment>> {
        self.inner.list_comments(post_id).await
    }
    async fn remove_comment(&self, id: DbId, commented_by: DbId) -> StoreResult<bool> {
        self.inner.remove_comment(id, commented_by).await
    }
}

#[tokio::test]
async fn counter_failure_does_not_fail_the_content_write() {
    let forum = ForumService::new(Arc::new(HookedStore {
        counter_offline: true,
        ..HookedStore::default()
    }));
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Flaky")).await.unwrap();

    let post = forum.create_post(u1, topic.id, &new_post("kept")).await.unwrap();
    assert_eq!(forum.get_post(post.id).await.unwrap().status, ContentStatus::Active);
    assert_eq!(post_count(&forum, topic.id).await, 1);

    // The decrement is lost and logged; the removal itself stands.
    forum.delete_post(u1, post.id).await.unwrap();
    assert_eq!(
        forum.get_post(post.id).await.unwrap().status,
        ContentStatus::Removed
    );
    assert_eq!(post_count(&forum, topic.id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_overlapping_a_slow_create_leaves_count_exact() {
    let (inserted_tx, mut inserted_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let forum = ForumService::new(Arc::new(HookedStore {
        hold_post_insert: Some(PostInsertHold {
            inserted: inserted_tx,
            release: Arc::clone(&release),
        }),
        ..HookedStore::default()
    }));
    let u1 = user(&forum, "u1").await;
    let topic = forum.create_topic(u1, &new_topic("Race")).await.unwrap();

    let creating = {
        let forum = forum.clone();
        tokio::spawn(async move { forum.create_post(u1, topic.id, &new_post("fast")).await })
    };

    // The post is committed but its create call has not returned yet.
    let post_id = inserted_rx.recv().await.unwrap();
    forum.delete_post(u1, post_id).await.unwrap();
    assert_eq!(post_count(&forum, topic.id).await, 0);

    release.notify_one();
    creating.await.unwrap().unwrap();

    let active = forum
        .search_posts(SearchScope::Topic(topic.id), &SearchRequest::all())
        .await
        .unwrap();
    assert!(active.is_empty());
    assert_eq!(post_count(&forum, topic.id).await, 0);
}

#[tokio::test]
async fn post_count_never_goes_negative() {
    let store = MemoryStore::new();
    let topic = store.create_topic(1, &new_topic("Edge")).await.unwrap();

    assert!(!store.adjust_post_count(topic.id, -1).await.unwrap());
    assert!(store.adjust_post_count(topic.id, 1).await.unwrap());
    assert!(store.adjust_post_count(topic.id, -1).await.unwrap());
    assert_eq!(store.find_topic(topic.id).await.unwrap().unwrap().post_count, 0);
    assert!(!store.adjust_post_count(999, 1).await.unwrap());
}

fn ids(posts: &[Post]) -> Vec<DbId> {
    posts.iter().map(|p| p.id).collect()
}
