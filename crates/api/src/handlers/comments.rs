//! Handlers for comments on posts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forum_core::entities::{Comment, NewComment};
use forum_core::types::DbId;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// GET /api/v1/posts/{post_id}/comments
///
/// Thread order, removed comments included.
pub async fn list_by_post(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let comments = state.forum.list_comments(post_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/posts/{post_id}/comments
///
/// Set `parent_id` in the body to reply to a top-level comment.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    ApiJson(input): ApiJson<NewComment>,
) -> AppResult<Created<Comment>> {
    let comment = state
        .forum
        .create_comment(auth.user_id, post_id, &input)
        .await?;
    Ok(Created(comment))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let comment = state.forum.get_comment(id).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.forum.delete_comment(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
