//! [`ForumStore`] backed by PostgreSQL.

use async_trait::async_trait;
use forum_core::entities::{Comment, NewComment, NewPost, NewTopic, Post, Topic, User};
use forum_core::store::{ForumStore, ListFilter, StoreError, StoreResult};
use forum_core::types::DbId;

use crate::repositories::{CommentRepo, PostRepo, TopicRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL implementation of the forum persistence gateway.
#[derive(Debug, Clone)]
pub struct PgForumStore {
    pool: DbPool,
}

impl PgForumStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error for the core.
///
/// - Unique violations (SQLSTATE `23505`) become `Conflict` with the
///   constraint name.
/// - Pool exhaustion and I/O failures become `Unavailable`.
/// - Everything else is `Backend`.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            StoreError::Conflict(db_err.constraint().unwrap_or("unknown").to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            StoreError::Backend(err.to_string())
        }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl ForumStore for PgForumStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    // -- Users --------------------------------------------------------------

    async fn create_user(&self, username: &str, bio: &str) -> StoreResult<User> {
        let row = UserRepo::create(&self.pool, username, bio)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let row = UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    // -- Topics -------------------------------------------------------------

    async fn create_topic(&self, created_by: DbId, input: &NewTopic) -> StoreResult<Topic> {
        TopicRepo::create(&self.pool, created_by, input)
            .await
            .map_err(map_sqlx_error)?
            .try_into()
    }

    async fn find_topic(&self, id: DbId) -> StoreResult<Option<Topic>> {
        TopicRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Topic::try_from)
            .transpose()
    }

    async fn list_topics(&self, filter: &ListFilter) -> StoreResult<Vec<Topic>> {
        let rows = TopicRepo::list(&self.pool, filter)
            .await
            .map_err(map_sqlx_error)?;
        convert_all(rows)
    }

    async fn remove_topic(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        TopicRepo::remove(&self.pool, id, created_by)
            .await
            .map_err(map_sqlx_error)
    }

    async fn adjust_post_count(&self, topic_id: DbId, delta: i64) -> StoreResult<bool> {
        TopicRepo::adjust_post_count(&self.pool, topic_id, delta)
            .await
            .map_err(map_sqlx_error)
    }

    // -- Posts --------------------------------------------------------------

    async fn create_post(
        &self,
        topic_id: DbId,
        created_by: DbId,
        input: &NewPost,
    ) -> StoreResult<Post> {
        PostRepo::create(&self.pool, topic_id, created_by, input)
            .await
            .map_err(map_sqlx_error)?
            .try_into()
    }

    async fn find_post(&self, id: DbId) -> StoreResult<Option<Post>> {
        PostRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn list_posts(
        &self,
        topic_id: Option<DbId>,
        filter: &ListFilter,
    ) -> StoreResult<Vec<Post>> {
        let rows = PostRepo::list(&self.pool, topic_id, filter)
            .await
            .map_err(map_sqlx_error)?;
        convert_all(rows)
    }

    async fn remove_post(&self, id: DbId, created_by: DbId) -> StoreResult<bool> {
        PostRepo::remove(&self.pool, id, created_by)
            .await
            .map_err(map_sqlx_error)
    }

    // -- Comments -----------------------------------------------------------

    async fn create_comment(
        &self,
        post_id: DbId,
        commented_by: DbId,
        input: &NewComment,
    ) -> StoreResult<Comment> {
        CommentRepo::create(&self.pool, post_id, commented_by, input)
            .await
            .map_err(map_sqlx_error)?
            .try_into()
    }

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        CommentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Comment::try_from)
            .transpose()
    }

    async fn list_comments(&self, post_id: DbId) -> StoreResult<Vec<Comment>> {
        let rows = CommentRepo::list_by_post(&self.pool, post_id)
            .await
            .map_err(map_sqlx_error)?;
        convert_all(rows)
    }

    async fn remove_comment(&self, id: DbId, commented_by: DbId) -> StoreResult<bool> {
        CommentRepo::remove(&self.pool, id, commented_by)
            .await
            .map_err(map_sqlx_error)
    }
}
