//! Ownership-based access control.
//!
//! The only predicate is equality between the acting user and the recorded
//! creator. There are no roles and no overrides.

use crate::entities::Owned;
use crate::error::CoreError;
use crate::types::DbId;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Decide whether `actor_id` may mutate a resource owned by `owner_id`.
pub fn authorize(actor_id: DbId, owner_id: DbId) -> AccessDecision {
    if actor_id == owner_id {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

/// Require that `actor_id` owns `resource`, mapping a denial to
/// [`CoreError::Forbidden`].
///
/// Callers must have already established that the resource exists.
pub fn ensure_owner<T: Owned>(actor_id: DbId, resource: &T) -> Result<(), CoreError> {
    match authorize(actor_id, resource.owner_id()) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny => Err(CoreError::Forbidden(format!(
            "Only the creator may remove {} {}",
            T::ENTITY,
            resource.id()
        ))),
    }
}
