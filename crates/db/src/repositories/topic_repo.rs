//! Repository for the `topics` table.

use forum_core::entities::NewTopic;
use forum_core::store::ListFilter;
use forum_core::types::DbId;
use sqlx::PgPool;

use super::ListClause;
use crate::models::topic::TopicRow;

/// Column list for `topics` queries.
const COLUMNS: &str = "id, name, description, created_by, created_at, status, post_count";

/// Expression searched by text queries.
const SEARCHABLE: &str = "name || ' ' || description";

/// Provides CRUD and aggregate operations for topics.
pub struct TopicRepo;

impl TopicRepo {
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &NewTopic,
    ) -> Result<TopicRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO topics (name, description, created_by) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TopicRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a topic by ID, whatever its status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TopicRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1");
        sqlx::query_as::<_, TopicRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List topics newest-first, optionally narrowed by a text query.
    pub async fn list(pool: &PgPool, filter: &ListFilter) -> Result<Vec<TopicRow>, sqlx::Error> {
        let clause = ListClause::build(filter, SEARCHABLE, 1);
        let query = format!(
            "SELECT {COLUMNS} FROM topics {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${} OFFSET ${}",
            clause.where_clause(&[]),
            clause.next_param,
            clause.next_param + 1
        );

        let mut q = sqlx::query_as::<_, TopicRow>(&query);
        if let (Some(pattern), Some(text)) = (&clause.pattern, &clause.query) {
            q = q.bind(pattern).bind(text);
        }
        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    /// Soft-delete an active topic owned by `created_by`.
    ///
    /// Returns `true` if a row was updated.
    pub async fn remove(pool: &PgPool, id: DbId, created_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE topics SET status = 'removed' \
             WHERE id = $1 AND created_by = $2 AND status = 'active'",
        )
        .bind(id)
        .bind(created_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add `delta` to `post_count` in a single statement.
    ///
    /// Returns `false` when the topic is missing or the count would drop
    /// below zero.
    pub async fn adjust_post_count(
        pool: &PgPool,
        topic_id: DbId,
        delta: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE topics SET post_count = post_count + $2 \
             WHERE id = $1 AND post_count + $2 >= 0",
        )
        .bind(topic_id)
        .bind(delta)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
