//! Content lifecycle engine for topics, posts, and comments.
//!
//! Every entity follows the same two-state machine, `active -> removed`.
//! Creation validates input and parent references; deletion checks, in
//! order: existence, current status, ownership.
//!
//! The parent topic's `post_count` is incremented by the store in the same
//! write that inserts a post. The decrement on deletion is best effort: it
//! runs after the status flip has committed and a failure is only logged,
//! never returned. Because every counted post was counted at insert time,
//! a decrement can never race ahead of its own increment.

use std::fmt;
use std::sync::Arc;

use crate::access::ensure_owner;
use crate::entities::{Comment, NewComment, NewPost, NewTopic, Owned, Post, Topic};
use crate::error::{CoreError, CoreResult};
use crate::status::ContentStatus;
use crate::store::ForumStore;
use crate::types::DbId;
use crate::validation::{validate_new_comment, validate_new_post, validate_new_topic};

/// A `post_count` adjustment that did not apply.
///
/// Never surfaced to callers; it is logged under the `forum_core::aggregate`
/// target for offline reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateInconsistency {
    pub topic_id: DbId,
    pub post_id: DbId,
    pub delta: i64,
    pub reason: String,
}

impl fmt::Display for AggregateInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "post_count of topic {} not adjusted by {} for post {}: {}",
            self.topic_id, self.delta, self.post_id, self.reason
        )
    }
}

/// Entry point for every forum operation.
///
/// Stateless apart from the store handle, so it is cheap to clone into
/// each request.
#[derive(Clone)]
pub struct ForumService {
    store: Arc<dyn ForumStore>,
}

impl ForumService {
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn ForumStore {
        self.store.as_ref()
    }

    /// Probe the underlying store.
    pub async fn ping(&self) -> CoreResult<()> {
        Ok(self.store.ping().await?)
    }

    // -----------------------------------------------------------------------
    // Topics
    // -----------------------------------------------------------------------

    pub async fn create_topic(&self, actor_id: DbId, input: &NewTopic) -> CoreResult<Topic> {
        validate_new_topic(input).map_err(CoreError::Validation)?;

        let topic = self.store.create_topic(actor_id, input).await?;
        tracing::info!(user_id = actor_id, topic_id = topic.id, "Topic created");
        Ok(topic)
    }

    /// Fetch a topic regardless of its status.
    pub async fn get_topic(&self, id: DbId) -> CoreResult<Topic> {
        self.store
            .find_topic(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Topic", id })
    }

    /// Soft-delete a topic. Its posts are left untouched.
    pub async fn delete_topic(&self, actor_id: DbId, id: DbId) -> CoreResult<Topic> {
        let topic = self.get_topic(id).await?;
        check_removable(actor_id, &topic)?;

        if !self.store.remove_topic(id, actor_id).await? {
            return Err(already_removed(&topic));
        }

        tracing::info!(user_id = actor_id, topic_id = id, "Topic removed");
        Ok(Topic {
            status: ContentStatus::Removed,
            ..topic
        })
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Create a post under an active topic. The store counts it against the
    /// topic as part of the insert.
    pub async fn create_post(
        &self,
        actor_id: DbId,
        topic_id: DbId,
        input: &NewPost,
    ) -> CoreResult<Post> {
        validate_new_post(input).map_err(CoreError::Validation)?;

        match self.store.find_topic(topic_id).await? {
            Some(topic) if topic.status.is_active() => {}
            _ => {
                return Err(CoreError::ParentNotFound {
                    entity: "Topic",
                    id: topic_id,
                })
            }
        }

        let post = self.store.create_post(topic_id, actor_id, input).await?;
        tracing::info!(user_id = actor_id, topic_id, post_id = post.id, "Post created");
        Ok(post)
    }

    /// Fetch a post regardless of its status.
    pub async fn get_post(&self, id: DbId) -> CoreResult<Post> {
        self.store
            .find_post(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Post", id })
    }

    /// Soft-delete a post and decrement its topic's `post_count`.
    pub async fn delete_post(&self, actor_id: DbId, id: DbId) -> CoreResult<Post> {
        let post = self.get_post(id).await?;
        check_removable(actor_id, &post)?;

        // Only the caller whose update flipped the row adjusts the counter,
        // so concurrent deletes of one post decrement at most once.
        if !self.store.remove_post(id, actor_id).await? {
            return Err(already_removed(&post));
        }
        tracing::info!(user_id = actor_id, topic_id = post.topic_id, post_id = id, "Post removed");

        self.adjust_post_count(post.topic_id, id, -1).await;
        Ok(Post {
            status: ContentStatus::Removed,
            ..post
        })
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Create a comment, or a reply when `input.parent_id` is set.
    ///
    /// A reply must target a top-level comment on the same post.
    pub async fn create_comment(
        &self,
        actor_id: DbId,
        post_id: DbId,
        input: &NewComment,
    ) -> CoreResult<Comment> {
        validate_new_comment(input).map_err(CoreError::Validation)?;

        match self.store.find_post(post_id).await? {
            Some(post) if post.status.is_active() => {}
            _ => {
                return Err(CoreError::ParentNotFound {
                    entity: "Post",
                    id: post_id,
                })
            }
        }

        if let Some(parent_id) = input.parent_id {
            let parent = match self.store.find_comment(parent_id).await? {
                Some(parent) if parent.post_id == post_id => parent,
                _ => {
                    return Err(CoreError::ParentNotFound {
                        entity: "Comment",
                        id: parent_id,
                    })
                }
            };
            if parent.parent_id.is_some() {
                return Err(CoreError::Validation(
                    "Replies can only be made to top-level comments".to_string(),
                ));
            }
        }

        let comment = self.store.create_comment(post_id, actor_id, input).await?;
        tracing::info!(
            user_id = actor_id,
            post_id,
            comment_id = comment.id,
            parent_id = ?comment.parent_id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Fetch a comment regardless of its status.
    pub async fn get_comment(&self, id: DbId) -> CoreResult<Comment> {
        self.store
            .find_comment(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Comment",
                id,
            })
    }

    /// Soft-delete a comment. Replies to it stay in place.
    pub async fn delete_comment(&self, actor_id: DbId, id: DbId) -> CoreResult<Comment> {
        let comment = self.get_comment(id).await?;
        check_removable(actor_id, &comment)?;

        if !self.store.remove_comment(id, actor_id).await? {
            return Err(already_removed(&comment));
        }

        tracing::info!(user_id = actor_id, post_id = comment.post_id, comment_id = id, "Comment removed");
        Ok(Comment {
            status: ContentStatus::Removed,
            ..comment
        })
    }

    // -----------------------------------------------------------------------
    // Aggregate maintenance
    // -----------------------------------------------------------------------

    /// Apply `delta` to a topic's `post_count`, logging instead of failing.
    async fn adjust_post_count(&self, topic_id: DbId, post_id: DbId, delta: i64) {
        let reason = match self.store.adjust_post_count(topic_id, delta).await {
            Ok(true) => return,
            Ok(false) => "no row updated".to_string(),
            Err(e) => e.to_string(),
        };

        let inconsistency = AggregateInconsistency {
            topic_id,
            post_id,
            delta,
            reason,
        };
        tracing::warn!(
            target: "forum_core::aggregate",
            topic_id,
            post_id,
            delta,
            "{inconsistency}"
        );
    }
}

/// Status and ownership checks shared by every delete. Existence has
/// already been established by the caller.
fn check_removable<T: Owned>(actor_id: DbId, entity: &T) -> CoreResult<()> {
    if !entity.status().can_transition_to(ContentStatus::Removed) {
        return Err(already_removed(entity));
    }
    ensure_owner(actor_id, entity)
}

fn already_removed<T: Owned>(entity: &T) -> CoreError {
    CoreError::AlreadyRemoved {
        entity: T::ENTITY,
        id: entity.id(),
    }
}
