//! Handlers for the `/topics` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forum_core::entities::{NewTopic, Topic};
use forum_core::search::SearchRequest;
use forum_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// GET /api/v1/topics?q=&include_removed=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Topic>>>> {
    let topics = state
        .forum
        .search_topics(&SearchRequest::from(params))
        .await?;
    Ok(Json(DataResponse { data: topics }))
}

/// POST /api/v1/topics
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTopic>,
) -> AppResult<Created<Topic>> {
    let topic = state.forum.create_topic(auth.user_id, &input).await?;
    Ok(Created(topic))
}

/// GET /api/v1/topics/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Topic>>> {
    let topic = state.forum.get_topic(id).await?;
    Ok(Json(DataResponse { data: topic }))
}

/// DELETE /api/v1/topics/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.forum.delete_topic(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
