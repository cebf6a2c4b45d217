//! Repository for the `users` table.

use forum_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserRow;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, bio, created_at";

/// Provides lookup and insert operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. A duplicate username violates `uq_users_username`.
    pub async fn create(pool: &PgPool, username: &str, bio: &str) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, bio) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .bind(bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }
}
