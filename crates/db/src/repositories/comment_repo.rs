//! Repository for the `comments` table.

use forum_core::entities::NewComment;
use forum_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::CommentRow;

/// Column list for `comments` queries.
const COLUMNS: &str = "id, post_id, commented_by, parent_id, body, created_at, status";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        commented_by: DbId,
        input: &NewComment,
    ) -> Result<CommentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (post_id, commented_by, parent_id, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(post_id)
            .bind(commented_by)
            .bind(input.parent_id)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CommentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All comments on a post in thread order (oldest first), removed
    /// ones included.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE post_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete an active comment written by `commented_by`.
    pub async fn remove(
        pool: &PgPool,
        id: DbId,
        commented_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET status = 'removed' \
             WHERE id = $1 AND commented_by = $2 AND status = 'active'",
        )
        .bind(id)
        .bind(commented_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
