//! Post row model.

use forum_core::entities::Post;
use forum_core::store::StoreError;
use forum_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::parse_status;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: DbId,
    pub topic_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub status: String,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            status: parse_status("posts", row.id, &row.status)?,
            id: row.id,
            topic_id: row.topic_id,
            created_by: row.created_by,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
        })
    }
}
