//! Scalar aliases shared by every forum entity.

/// Identifier of a user, topic, post, or comment (`BIGSERIAL` in Postgres).
pub type DbId = i64;

/// Creation instants, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
