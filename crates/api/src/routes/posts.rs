//! Route definitions for the `/posts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, posts};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                 -> list
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
///
/// GET    /{id}/comments    -> comments::list_by_post
/// POST   /{id}/comments    -> comments::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list))
        .route("/{id}", get(posts::get_by_id).delete(posts::delete))
        .route(
            "/{id}/comments",
            get(comments::list_by_post).post(comments::create),
        )
}
