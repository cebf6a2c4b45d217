//! Handlers for posts, both global (`/posts`) and topic-scoped
//! (`/topics/{topic_id}/posts`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forum_core::entities::{NewPost, Post};
use forum_core::search::{SearchRequest, SearchScope};
use forum_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// GET /api/v1/posts?q=
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts = state
        .forum
        .search_posts(SearchScope::Global, &SearchRequest::from(params))
        .await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/topics/{topic_id}/posts?q=
pub async fn list_by_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts = state
        .forum
        .search_posts(SearchScope::Topic(topic_id), &SearchRequest::from(params))
        .await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/topics/{topic_id}/posts
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    ApiJson(input): ApiJson<NewPost>,
) -> AppResult<Created<Post>> {
    let post = state.forum.create_post(auth.user_id, topic_id, &input).await?;
    Ok(Created(post))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Post>>> {
    let post = state.forum.get_post(id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.forum.delete_post(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
