#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use forum_core::lifecycle::ForumService;
use forum_core::memory::MemoryStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

use forum_api::auth::jwt::JwtConfig;
use forum_api::config::ServerConfig;
use forum_api::router::build_app_router;
use forum_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        db_connect_timeout_secs: 5,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: Some(TEST_SECRET.to_string()),
            expiry_hours: 24,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

/// Build the full application router with a custom configuration.
pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState {
        forum: ForumService::new(Arc::new(MemoryStore::new())),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST an arbitrary, possibly malformed, JSON body.
pub async fn post_raw_auth(app: &Router, uri: &str, token: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Log in (creating the user on first login) and return `(token, user_id)`.
pub async fn login(app: &Router, username: &str) -> (String, i64) {
    let response = post_json(app, "/api/v1/login", serde_json::json!({ "username": username })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

/// Create a topic and return its id.
pub async fn create_topic(app: &Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name, "description": format!("About {name}") });
    let response = post_json_auth(app, "/api/v1/topics", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a post in `topic_id` and return its id.
pub async fn create_post(app: &Router, token: &str, topic_id: i64, title: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "body": format!("{title} body") });
    let uri = format!("/api/v1/topics/{topic_id}/posts");
    let response = post_json_auth(app, &uri, token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
