//! Handlers for users: registration, lookup, and username login.

use axum::extract::{Path, State};
use axum::Json;
use forum_core::entities::{NewUser, User};
use forum_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewUser>,
) -> AppResult<Created<User>> {
    let user = state.forum.register_user(&input).await?;
    Ok(Created(user))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state.forum.get_user(id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/login
///
/// Resolve the username to a user, creating it on first login, and issue
/// an access token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state.forum.login(&input.username).await?;
    let access_token = generate_access_token(user.id, &state.config.jwt)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    }))
}
