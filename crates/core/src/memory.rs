//! In-memory [`ForumStore`] for tests and local development.
//!
//! All tables sit behind one `RwLock`, so every method is atomic with
//! respect to the others, including `adjust_post_count`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::entities::{Comment, NewComment, NewPost, NewTopic, Post, Topic, User};
use crate::search::text_matches;
use crate::status::ContentStatus;
use crate::store::{ForumStore, ListFilter, StoreError, StoreResult};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    topics: BTreeMap<DbId, Topic>,
    posts: BTreeMap<DbId, Post>,
    comments: BTreeMap<DbId, Comment>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    frozen_at: Option<Timestamp>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that stamps every row with `at`, so listings fall back to
    /// their id tie-break.
    pub fn with_frozen_clock(at: Timestamp) -> Self {
        Self {
            frozen_at: Some(at),
            ..Self::default()
        }
    }

    fn now(&self) -> Timestamp {
        self.frozen_at.unwrap_or_else(Utc::now)
    }
}

/// Apply offset/limit to an already ordered listing.
fn paginate<T>(rows: Vec<T>, filter: &ListFilter) -> Vec<T> {
    let skipped = rows.into_iter().skip(filter.offset.max(0) as usize);
    match filter.limit {
        Some(limit) => skipped.take(limit.max(0) as usize).collect(),
        None => skipped.collect(),
    }
}

fn visible(status: ContentStatus, filter: &ListFilter) -> bool {
    filter.include_removed || status.is_active()
}

fn matches_text(filter: &ListFilter, fields: &[&str]) -> bool {
    filter
        .text
        .as_deref()
        .map_or(true, |query| text_matches(query, fields))
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    // -- Users --------------------------------------------------------------

    async fn create_user(&self, username: &str, bio: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict("uq_users_username".to_string()));
        }
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            bio: bio.to_string(),
            created_at: self.now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    // -- Topics -------------------------------------------------------------

    async fn create_topic(&self, created_by: DbId, input: &NewTopic) -> StoreResult<Topic> {
        let mut tables = self.tables.write().await;
        let topic = Topic {
            id: tables.next_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            created_by,
            created_at: self.now(),
            status: ContentStatus::Active,
            post_count: 0,
        };
        tables.topics.insert(topic.id, topic.clone());
        Ok(topic)
    }

    async fn find_topic(&self, id: DbId) -> StoreResult<Option<Topic>> {
        Ok(self.tables.read().await.topics.get(&id).cloned())
    }

    async fn list_topics(&self, filter: &ListFilter) -> StoreResult<Vec<Topic>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Topic> = tables
            .topics
            .values()
            .filter(|t| visible(t.status, filter))
            .filter(|t| matches_text(filter, &[t.name.as_str(), t.description.as_str()]))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, filter))
    }

    async fn remove_topic(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.topics.get_mut(&id) {
            Some(t) if t.created_by == created_by && t.status.is_active() => {
                t.status = ContentStatus::Removed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn adjust_post_count(&self, topic_id: DbId, delta: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.topics.get_mut(&topic_id) {
            Some(t) if t.post_count + delta >= 0 => {
                t.post_count += delta;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // -- Posts --------------------------------------------------------------

    async fn create_post(
        &self,
        topic_id: DbId,
        created_by: DbId,
        input: &NewPost,
    ) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let created_at = self.now();
        let Some(topic) = tables.topics.get_mut(&topic_id) else {
            return Err(StoreError::Backend(format!(
                "foreign key violation: topic {topic_id} does not exist"
            )));
        };
        topic.post_count += 1;

        let post = Post {
            id,
            topic_id,
            created_by,
            title: input.title.clone(),
            body: input.body.clone(),
            created_at,
            status: ContentStatus::Active,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: DbId) -> StoreResult<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(
        &self,
        topic_id: Option<DbId>,
        filter: &ListFilter,
    ) -> StoreResult<Vec<Post>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| topic_id.map_or(true, |id| p.topic_id == id))
            .filter(|p| visible(p.status, filter))
            .filter(|p| matches_text(filter, &[p.title.as_str(), p.body.as_str()]))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, filter))
    }

    async fn remove_post(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.posts.get_mut(&id) {
            Some(p) if p.created_by == created_by && p.status.is_active() => {
                p.status = ContentStatus::Removed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // -- Comments -----------------------------------------------------------

    async fn create_comment(
        &self,
        post_id: DbId,
        commented_by: DbId,
        input: &NewComment,
    ) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(StoreError::Backend(format!(
                "foreign key violation: post {post_id} does not exist"
            )));
        }
        let comment = Comment {
            id: tables.next_id(),
            post_id,
            commented_by,
            parent_id: input.parent_id,
            body: input.body.clone(),
            created_at: self.now(),
            status: ContentStatus::Active,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments(&self, post_id: DbId) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn remove_comment(&self, id: DbId, commented_by: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.comments.get_mut(&id) {
            Some(c) if c.commented_by == commented_by && c.status.is_active() => {
                c.status = ContentStatus::Removed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
