pub mod comments;
pub mod health;
pub mod posts;
pub mod topics;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                                           login (public)
///
/// /users                                           register
/// /users/{id}                                      get
///
/// /topics                                          list/search, create
/// /topics/{id}                                     get, delete
/// /topics/{id}/posts                               list/search, create
///
/// /posts                                           list/search (all topics)
/// /posts/{id}                                      get, delete
/// /posts/{id}/comments                             list, create
///
/// /comments/{id}                                   get, delete
/// ```
///
/// Reads are public. Creates and deletes require a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .nest("/topics", topics::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
}
