//! Row types for the forum tables.
//!
//! Each row maps one-to-one onto a table and converts into the matching
//! `forum_core` entity, parsing the `status` text column on the way.

pub mod comment;
pub mod post;
pub mod topic;
pub mod user;

use forum_core::status::ContentStatus;
use forum_core::store::StoreError;

/// Parse a `status` column value, rejecting anything outside the
/// `active`/`removed` check constraint.
pub(crate) fn parse_status(table: &str, id: i64, raw: &str) -> Result<ContentStatus, StoreError> {
    raw.parse()
        .map_err(|e| StoreError::Backend(format!("{table} row {id}: {e}")))
}
