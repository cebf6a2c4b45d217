//! Repository for the `posts` table.

use forum_core::entities::NewPost;
use forum_core::store::ListFilter;
use forum_core::types::DbId;
use sqlx::PgPool;

use super::ListClause;
use crate::models::post::PostRow;

/// Column list for `posts` queries.
const COLUMNS: &str = "id, topic_id, created_by, title, body, created_at, status";

/// Expression searched by text queries.
const SEARCHABLE: &str = "title || ' ' || body";

/// Provides CRUD operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a post and increment its topic's `post_count` in one
    /// statement, so the row and its count commit together.
    pub async fn create(
        pool: &PgPool,
        topic_id: DbId,
        created_by: DbId,
        input: &NewPost,
    ) -> Result<PostRow, sqlx::Error> {
        let query = format!(
            "WITH inserted AS ( \
                 INSERT INTO posts (topic_id, created_by, title, body) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING {COLUMNS} \
             ), counted AS ( \
                 UPDATE topics SET post_count = post_count + 1 \
                 WHERE id = $1 \
             ) \
             SELECT {COLUMNS} FROM inserted"
        );
        sqlx::query_as::<_, PostRow>(&query)
            .bind(topic_id)
            .bind(created_by)
            .bind(&input.title)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Find a post by ID, whatever its status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PostRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List posts newest-first, across all topics or within one.
    pub async fn list(
        pool: &PgPool,
        topic_id: Option<DbId>,
        filter: &ListFilter,
    ) -> Result<Vec<PostRow>, sqlx::Error> {
        let mut leading = Vec::new();
        let mut first_param = 1;
        if topic_id.is_some() {
            leading.push("topic_id = $1".to_string());
            first_param = 2;
        }

        let clause = ListClause::build(filter, SEARCHABLE, first_param);
        let query = format!(
            "SELECT {COLUMNS} FROM posts {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${} OFFSET ${}",
            clause.where_clause(&leading),
            clause.next_param,
            clause.next_param + 1
        );

        let mut q = sqlx::query_as::<_, PostRow>(&query);
        if let Some(id) = topic_id {
            q = q.bind(id);
        }
        if let (Some(pattern), Some(text)) = (&clause.pattern, &clause.query) {
            q = q.bind(pattern).bind(text);
        }
        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    /// Soft-delete an active post owned by `created_by`.
    ///
    /// Returns `true` if a row was updated.
    pub async fn remove(pool: &PgPool, id: DbId, created_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET status = 'removed' \
             WHERE id = $1 AND created_by = $2 AND status = 'active'",
        )
        .bind(id)
        .bind(created_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
