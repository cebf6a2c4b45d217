//! Route definitions for users and login.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// POST   /login         -> login
/// POST   /users         -> register
/// GET    /users/{id}    -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(users::login))
        .route("/users", post(users::register))
        .route("/users/{id}", get(users::get_user))
}
