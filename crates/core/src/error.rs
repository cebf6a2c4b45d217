use crate::store::StoreError;
use crate::types::DbId;

/// Domain-level failure returned by every forum operation.
///
/// Each variant is a distinct outcome the transport layer must be able to
/// tell apart; none of them is swallowed inside the core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A required parent (topic, post, or sibling comment) is missing or
    /// belongs to a different ancestor.
    #[error("Parent not found: {entity} with id {id}")]
    ParentNotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// No credential was presented, or it is not a Bearer token. Distinct
    /// from [`CoreError::Forbidden`], which means "identified, not allowed".
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Credential has expired")]
    ExpiredCredential,

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The server is missing configuration required for the operation
    /// (e.g. the token signing key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{entity} with id {id} has already been removed")]
    AlreadyRemoved { entity: &'static str, id: DbId },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
