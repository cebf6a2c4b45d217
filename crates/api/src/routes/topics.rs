//! Route definitions for the `/topics` resource.
//!
//! Also nests topic-scoped post routes under `/topics/{id}/posts`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{posts, topics};
use crate::state::AppState;

/// Routes mounted at `/topics`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// DELETE /{id}           -> delete
///
/// GET    /{id}/posts     -> posts::list_by_topic
/// POST   /{id}/posts     -> posts::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(topics::list).post(topics::create))
        .route("/{id}", get(topics::get_by_id).delete(topics::delete))
        .route("/{id}/posts", get(posts::list_by_topic).post(posts::create))
}
