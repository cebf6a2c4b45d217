//! Liveness/readiness probe, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, `degraded` (store up, signing key missing) or `unavailable`.
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub auth: &'static str,
}

/// GET /health
///
/// Answers 503 only when the store cannot be reached; a missing signing key
/// still serves public reads, so it is reported but keeps 200.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_up = match state.forum.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed");
            false
        }
    };
    let key_present = state.config.jwt.secret.as_deref().is_some_and(|s| !s.is_empty());

    let (code, status) = match (store_up, key_present) {
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        (true, false) => (StatusCode::OK, "degraded"),
        (true, true) => (StatusCode::OK, "ok"),
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: if store_up { "up" } else { "down" },
        auth: if key_present { "configured" } else { "missing_key" },
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
