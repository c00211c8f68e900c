//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the production router construction so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that `main.rs` wires up.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use snagtrack_api::audit::PgAuditSink;
use snagtrack_api::auth::jwt::JwtConfig;
use snagtrack_api::config::ServerConfig;
use snagtrack_api::router::build_app_router;
use snagtrack_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router backed by the given database pool.
///
/// Uses the real Postgres audit sink so gated requests leave audit rows,
/// same as production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        audit: Arc::new(PgAuditSink::new(pool)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers (tower `oneshot`)
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body, no authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body and a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Password used for all fixture accounts.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Register an account through the API and return `(user_id, access_token)`.
pub async fn register_user(pool: &PgPool, username: &str, role: &str) -> (i64, String) {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@test.com"),
        "phone": "+7 (900) 123-45-67",
        "password": TEST_PASSWORD,
        "role": role,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "fixture registration should succeed"
    );
    let json = body_json(response).await;
    (
        json["user"]["id"].as_i64().expect("user id"),
        json["access_token"].as_str().expect("access token").to_string(),
    )
}

/// Create a project through the API as the given manager and return its id.
pub async fn create_project(
    pool: &PgPool,
    manager_id: i64,
    manager_token: &str,
    name: &str,
) -> i64 {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": name,
        "description": "fixture project",
        "start_date": "2024-01-01",
        "end_date": "2024-12-31",
        "manager_id": manager_id,
    });
    let response = post_json_auth(app, "/api/v1/manager/projects", body, manager_token).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "fixture project creation should succeed"
    );
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("project id")
}

/// Create a defect through the API as the given engineer and return the
/// `data` object from the response.
pub async fn create_defect(
    pool: &PgPool,
    engineer_token: &str,
    project_id: i64,
    title: &str,
) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "title": title,
        "description": "fixture defect",
        "project_id": project_id,
        "deadline": "2024-06-30",
    });
    let response = post_json_auth(app, "/api/v1/engineer/defects", body, engineer_token).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "fixture defect creation should succeed"
    );
    body_json(response).await["data"].clone()
}
