//! Persistence gateway consumed by the lifecycle engine.
//!
//! Implementations own id assignment, timestamps, ordering, and text
//! matching. Two invariants are pushed down to the store:
//!
//! - [`ForumStore::create_post`] inserts the post and adds one to its
//!   topic's `post_count` in the same atomic write, so a post is never
//!   visible without having been counted.
//! - [`ForumStore::adjust_post_count`] is a single atomic write
//!   (`post_count = post_count + delta`), never a read-modify-write.
//! - The `remove_*` methods are scoped by `(id, expected creator)` and only
//!   touch rows that are still active; `Ok(false)` means zero rows affected.

use async_trait::async_trait;

use crate::entities::{Comment, NewComment, NewPost, NewTopic, Post, Topic, User};
use crate::types::DbId;

/// Failure reported by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The backend could not be reached in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter applied to topic and post listings.
///
/// `text` is already normalised: `None` means "list all", `Some` is a
/// non-empty, trimmed query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub text: Option<String>,
    pub include_removed: bool,
    /// `None` means unbounded.
    pub limit: Option<i64>,
    pub offset: i64,
}

#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Cheap reachability probe.
    async fn ping(&self) -> StoreResult<()>;

    // -- Users --------------------------------------------------------------

    async fn create_user(&self, username: &str, bio: &str) -> StoreResult<User>;

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    // -- Topics -------------------------------------------------------------

    async fn create_topic(&self, created_by: DbId, input: &NewTopic) -> StoreResult<Topic>;

    async fn find_topic(&self, id: DbId) -> StoreResult<Option<Topic>>;

    /// Newest first, ties broken by descending id.
    async fn list_topics(&self, filter: &ListFilter) -> StoreResult<Vec<Topic>>;

    async fn remove_topic(&self, id: DbId, created_by: DbId) -> StoreResult<bool>;

    /// Atomically add `delta` to the topic's `post_count`. Returns `false`
    /// when no row was updated (missing topic, or the result would be negative).
    async fn adjust_post_count(&self, topic_id: DbId, delta: i64) -> StoreResult<bool>;

    // -- Posts --------------------------------------------------------------

    /// Insert an active post and increment the topic's `post_count`
    /// atomically with it.
    async fn create_post(
        &self,
        topic_id: DbId,
        created_by: DbId,
        input: &NewPost,
    ) -> StoreResult<Post>;

    async fn find_post(&self, id: DbId) -> StoreResult<Option<Post>>;

    /// Newest first, ties broken by descending id. `topic_id = None` lists
    /// posts across all topics.
    async fn list_posts(
        &self,
        topic_id: Option<DbId>,
        filter: &ListFilter,
    ) -> StoreResult<Vec<Post>>;

    async fn remove_post(&self, id: DbId, created_by: DbId) -> StoreResult<bool>;

    // -- Comments -----------------------------------------------------------

    async fn create_comment(
        &self,
        post_id: DbId,
        commented_by: DbId,
        input: &NewComment,
    ) -> StoreResult<Comment>;

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>>;

    /// Thread order: oldest first, ties broken by ascending id. Includes
    /// removed comments.
    async fn list_comments(&self, post_id: DbId) -> StoreResult<Vec<Comment>>;

    async fn remove_comment(&self, id: DbId, commented_by: DbId) -> StoreResult<bool>;
}
