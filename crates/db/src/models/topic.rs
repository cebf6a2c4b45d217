//! Topic row model.

use forum_core::entities::Topic;
use forum_core::store::StoreError;
use forum_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::parse_status;

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow)]
pub struct TopicRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub status: String,
    pub post_count: i64,
}

impl TryFrom<TopicRow> for Topic {
    type Error = StoreError;

    fn try_from(row: TopicRow) -> Result<Self, Self::Error> {
        Ok(Topic {
            status: parse_status("topics", row.id, &row.status)?,
            id: row.id,
            name: row.name,
            description: row.description,
            created_by: row.created_by,
            created_at: row.created_at,
            post_count: row.post_count,
        })
    }
}
