//! Comment row model.

use forum_core::entities::Comment;
use forum_core::store::StoreError;
use forum_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::parse_status;

/// A row from the `comments` table. `parent_id` is NULL for top-level
/// comments.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: DbId,
    pub post_id: DbId,
    pub commented_by: DbId,
    pub parent_id: Option<DbId>,
    pub body: String,
    pub created_at: Timestamp,
    pub status: String,
}

impl TryFrom<CommentRow> for Comment {
    type Error = StoreError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            status: parse_status("comments", row.id, &row.status)?,
            id: row.id,
            post_id: row.post_id,
            commented_by: row.commented_by,
            parent_id: row.parent_id,
            body: row.body,
            created_at: row.created_at,
        })
    }
}
