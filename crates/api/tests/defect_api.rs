//! HTTP-level integration tests for the engineer defect workflow: creation
//! defaults, lifecycle updates, ownership scoping, sanitization, and the
//! authorization gate.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_defect, create_project, get, get_auth, post_json_auth, put_json_auth,
    register_user,
};
use sqlx::PgPool;

/// Register a manager + engineer pair and a project, returning
/// `(engineer_token, project_id)`.
async fn setup(pool: &PgPool) -> (String, i64) {
    let (manager_id, manager_token) = register_user(pool, "petrov_m", "manager").await;
    let project_id = create_project(pool, manager_id, &manager_token, "Tower A").await;
    let (_, engineer_token) = register_user(pool, "ivanov_e", "engineer").await;
    (engineer_token, project_id)
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// A new defect starts in status `new` with the default `medium` priority.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_defect_defaults(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;

    let defect = create_defect(&pool, &token, project_id, "Cracked beam").await;
    assert_eq!(defect["status"], "new");
    assert_eq!(defect["priority"], "medium");
    assert_eq!(defect["title"], "Cracked beam");
    assert_eq!(defect["is_overdue"].as_bool(), Some(true)); // 2024 deadline is past
}

/// An explicit priority overrides the default.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_defect_with_priority(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "title": "Water leak",
        "description": "Basement, north wall",
        "project_id": project_id,
        "deadline": "2024-03-01",
        "priority": "critical",
    });
    let response = post_json_auth(app, "/api/v1/engineer/defects", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["priority"], "critical");
    assert_eq!(json["data"]["status"], "new");
}

/// A deadline outside the project's date range is rejected with 400; one on
/// the boundary is accepted.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_defect_deadline_window(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;

    // Past the project end date.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "title": "Late defect",
        "description": "x",
        "project_id": project_id,
        "deadline": "2025-01-15",
    });
    let response = post_json_auth(app, "/api/v1/engineer/defects", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Exactly on the end date: inclusive, accepted.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "title": "Boundary defect",
        "description": "x",
        "project_id": project_id,
        "deadline": "2024-12-31",
    });
    let response = post_json_auth(app, "/api/v1/engineer/defects", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Free-text fields are persisted HTML-escaped.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_defect_sanitizes_title(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;

    let defect = create_defect(
        &pool,
        &token,
        project_id,
        "<script>alert(1)</script> crack",
    )
    .await;
    assert_eq!(
        defect["title"],
        "&lt;script&gt;alert(1)&lt;/script&gt; crack"
    );
}

// ---------------------------------------------------------------------------
// Lifecycle updates
// ---------------------------------------------------------------------------

/// Updating only the status preserves every other field.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_status_preserves_priority(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;
    let defect = create_defect(&pool, &token, project_id, "Loose railing").await;
    let id = defect["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "in_progress" });
    let response =
        put_json_auth(app, &format!("/api/v1/engineer/defects/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["title"], "Loose railing");
}

/// A status outside the vocabulary is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_rejects_unknown_status(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;
    let defect = create_defect(&pool, &token, project_id, "Bad paint").await;
    let id = defect["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "reopened" });
    let response =
        put_json_auth(app, &format!("/api/v1/engineer/defects/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Ownership scoping and the authorization gate
// ---------------------------------------------------------------------------

/// Fetching another engineer's defect returns 404, not 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_defect_is_not_found(pool: PgPool) {
    let (owner_token, project_id) = setup(&pool).await;
    let defect = create_defect(&pool, &owner_token, project_id, "Owned defect").await;
    let id = defect["id"].as_i64().unwrap();

    let (_, other_token) = register_user(&pool, "sidorov_e", "engineer").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/engineer/defects/{id}"), &other_token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// An unauthenticated request to a gated route gets the login-redirect
/// outcome: 401 with the LOGIN_REQUIRED code.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_requires_login(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/engineer/defects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LOGIN_REQUIRED");
}

/// The wrong role is denied with 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_denies_wrong_role(pool: PgPool) {
    let (_, viewer_token) = register_user(&pool, "viewer_v", "viewer").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/engineer/defects", &viewer_token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

/// Gate decisions land in the audit trail, passes included.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_decisions_are_audited(pool: PgPool) {
    let (token, _) = setup(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/engineer/defects", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (action, outcome, operation): (String, String, String) = sqlx::query_as(
        "SELECT action, outcome, operation FROM audit_logs
         WHERE action = 'authz_check' ORDER BY id DESC LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .expect("an authz audit row should exist");

    assert_eq!(action, "authz_check");
    assert_eq!(outcome, "pass");
    assert_eq!(operation, "GET /api/v1/engineer/defects");
}

// ---------------------------------------------------------------------------
// Comments, attachments, stats
// ---------------------------------------------------------------------------

/// Comments append in order and come back with the defect detail.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comments_append(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;
    let defect = create_defect(&pool, &token, project_id, "Chipped tile").await;
    let id = defect["id"].as_i64().unwrap();

    for text in ["first note", "second note"] {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "text": text });
        let response = post_json_auth(
            app,
            &format!("/api/v1/engineer/defects/{id}/comments"),
            body,
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/engineer/defects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let comments = json["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "first note");
    assert_eq!(comments[1]["text"], "second note");
}

/// Attachment metadata is recorded against the defect.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_attachment_metadata(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;
    let defect = create_defect(&pool, &token, project_id, "Sagging door").await;
    let id = defect["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "file_name": "photo.jpg",
        "file_path": "/uploads/photo.jpg",
    });
    let response = post_json_auth(
        app,
        &format!("/api/v1/engineer/defects/{id}/attachments"),
        body,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["file_name"], "photo.jpg");
    assert_eq!(json["data"]["defect_id"], id);
}

/// Engineer stats count only the caller's defects and zero-fill the
/// vocabulary.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_engineer_stats(pool: PgPool) {
    let (token, project_id) = setup(&pool).await;
    create_defect(&pool, &token, project_id, "Defect one").await;
    create_defect(&pool, &token, project_id, "Defect two").await;

    // A different engineer's defect must not show up.
    let (_, other_token) = register_user(&pool, "other_e", "engineer").await;
    create_defect(&pool, &other_token, project_id, "Not mine").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/engineer/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["by_status"]["New"], 2);
    assert_eq!(json["data"]["by_status"]["Closed"], 0);
    assert_eq!(json["data"]["by_priority"]["Medium"], 2);
    // Fixture deadlines are in the past, so both defects are overdue.
    assert_eq!(json["data"]["overdue"].as_array().unwrap().len(), 2);
}
