//! Handlers for the `/engineer` surface: the assigned engineer's own
//! defect workflow.
//!
//! Every read here is scoped to defects assigned to the caller. A defect
//! assigned to someone else is reported as 404, never 403, so the surface
//! does not confirm that the row exists.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use snagtrack_core::audit::{actions, outcomes, AuditEvent};
use snagtrack_core::error::CoreError;
use snagtrack_core::lifecycle::{
    parse_priority, parse_status, validate_deadline, DEFAULT_PRIORITY, INITIAL_STATUS,
};
use snagtrack_core::roles::Role;
use snagtrack_core::sanitize::escape_html;
use snagtrack_core::types::{Date, DbId};
use snagtrack_db::models::attachment::{CreateAttachment, DefectAttachment};
use snagtrack_db::models::comment::{CreateComment, DefectComment};
use snagtrack_db::models::defect::{CreateDefect, Defect, UpdateDefect};
use snagtrack_db::repositories::{
    AttachmentRepo, CommentRepo, DefectRepo, ProjectRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::{defect_views, priority_counts, status_counts, DefectView};
use crate::middleware::rbac::RequireEngineer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /engineer/defects`.
#[derive(Debug, Deserialize)]
pub struct DefectListQuery {
    pub status: Option<String>,
}

/// Request body for `POST /engineer/defects`.
#[derive(Debug, Deserialize)]
pub struct CreateDefectRequest {
    pub title: String,
    pub description: String,
    pub project_id: DbId,
    pub deadline: Date,
    /// Absent priority keeps the default (`medium`).
    pub priority: Option<String>,
}

/// Request body for `PUT /engineer/defects/{id}`. `None` fields keep the
/// stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateDefectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<DbId>,
    pub deadline: Option<Date>,
}

/// Request body for `POST /engineer/defects/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Request body for `POST /engineer/defects/{id}/attachments`.
#[derive(Debug, Deserialize)]
pub struct CreateAttachmentRequest {
    pub file_name: String,
    pub file_path: String,
}

/// Response for `GET /engineer/defects/{id}`.
#[derive(Debug, Serialize)]
pub struct DefectDetail {
    #[serde(flatten)]
    pub defect: DefectView,
    pub comments: Vec<DefectComment>,
    pub attachments: Vec<DefectAttachment>,
}

/// Response for `GET /engineer/stats`.
#[derive(Debug, Serialize)]
pub struct EngineerStats {
    pub by_status: BTreeMap<&'static str, i64>,
    pub by_priority: BTreeMap<&'static str, i64>,
    pub overdue: Vec<DefectView>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/engineer/defects
///
/// The caller's assigned defects, newest first, optionally filtered by
/// status.
pub async fn list_defects(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Query(query): Query<DefectListQuery>,
) -> AppResult<Json<DataResponse<Vec<DefectView>>>> {
    let status = match &query.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    let defects = DefectRepo::list_for_assignee(
        &state.pool,
        user.user_id,
        status.map(|s| s.as_str()),
    )
    .await?;
    Ok(Json(DataResponse {
        data: defect_views(defects),
    }))
}

/// POST /api/v1/engineer/defects
///
/// Create a defect assigned to the caller, with status `new` and the
/// default priority unless one is given. The deadline must fall inside the
/// project's date range.
pub async fn create_defect(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Json(input): Json<CreateDefectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DefectView>>)> {
    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })?;
    validate_deadline(project.start_date, project.end_date, input.deadline)?;

    let priority = match &input.priority {
        Some(p) => parse_priority(p)?,
        None => DEFAULT_PRIORITY,
    };

    let create = CreateDefect {
        title: escape_html(&input.title),
        description: escape_html(&input.description),
        project_id: input.project_id,
        status: INITIAL_STATUS.as_str().to_string(),
        priority: priority.as_str().to_string(),
        assigned_to: user.user_id,
        created_by: user.user_id,
        deadline: input.deadline,
    };
    let defect = DefectRepo::create(&state.pool, &create).await?;

    record_domain_event(
        &state,
        &user,
        actions::ENTITY_CREATE,
        format!("POST /api/v1/engineer/defects#{}", defect.id),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DefectView::from(defect),
        }),
    ))
}

/// GET /api/v1/engineer/defects/{id}
///
/// One of the caller's defects with its comments and attachments.
pub async fn get_defect(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DefectDetail>>> {
    let defect = find_own_defect(&state, &user, id).await?;
    let comments = CommentRepo::list_for_defect(&state.pool, id).await?;
    let attachments = AttachmentRepo::list_for_defect(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: DefectDetail {
            defect: DefectView::from(defect),
            comments,
            attachments,
        },
    }))
}

/// PUT /api/v1/engineer/defects/{id}
///
/// Lifecycle update by the assigned engineer. Last write wins on concurrent
/// updates.
pub async fn update_defect(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDefectRequest>,
) -> AppResult<Json<DataResponse<DefectView>>> {
    let defect = find_own_defect(&state, &user, id).await?;

    if let Some(status) = &input.status {
        parse_status(status)?;
    }
    if let Some(priority) = &input.priority {
        parse_priority(priority)?;
    }
    if let Some(assignee_id) = input.assigned_to {
        validate_assignee_role(&state, assignee_id).await?;
    }
    if let Some(deadline) = input.deadline {
        let project = ProjectRepo::find_by_id(&state.pool, defect.project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: defect.project_id,
            })?;
        validate_deadline(project.start_date, project.end_date, deadline)?;
    }

    let update = UpdateDefect {
        title: input.title.as_deref().map(escape_html),
        description: input.description.as_deref().map(escape_html),
        status: input.status,
        priority: input.priority,
        assigned_to: input.assigned_to,
        deadline: input.deadline,
    };
    let updated = DefectRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Defect",
            id,
        })?;

    record_domain_event(
        &state,
        &user,
        actions::ENTITY_UPDATE,
        format!("PUT /api/v1/engineer/defects/{id}"),
    )
    .await;

    Ok(Json(DataResponse {
        data: DefectView::from(updated),
    }))
}

/// POST /api/v1/engineer/defects/{id}/comments
///
/// Append a comment to one of the caller's defects. Comments are immutable
/// once written; the author is stamped from the session identity.
pub async fn add_comment(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DefectComment>>)> {
    find_own_defect(&state, &user, id).await?;

    let create = CreateComment {
        defect_id: id,
        author_id: user.user_id,
        text: escape_html(&input.text),
    };
    let comment = CommentRepo::create(&state.pool, &create).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// POST /api/v1/engineer/defects/{id}/attachments
///
/// Append attachment metadata to one of the caller's defects. File bytes
/// live with external storage; only the name and path are recorded.
pub async fn add_attachment(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAttachmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DefectAttachment>>)> {
    find_own_defect(&state, &user, id).await?;

    let create = CreateAttachment {
        defect_id: id,
        file_name: escape_html(&input.file_name),
        file_path: input.file_path,
        uploaded_by: user.user_id,
    };
    let attachment = AttachmentRepo::create(&state.pool, &create).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}

/// GET /api/v1/engineer/stats
///
/// The caller's defect counts by status and priority, plus the overdue
/// list. Computed fresh per request.
pub async fn stats(
    State(state): State<AppState>,
    RequireEngineer(user): RequireEngineer,
) -> AppResult<Json<DataResponse<EngineerStats>>> {
    let by_status = DefectRepo::counts_by_status(&state.pool, Some(user.user_id), None).await?;
    let by_priority = DefectRepo::counts_by_priority(&state.pool, Some(user.user_id)).await?;
    let overdue = DefectRepo::list_overdue(&state.pool, Some(user.user_id)).await?;

    Ok(Json(DataResponse {
        data: EngineerStats {
            by_status: status_counts(&by_status),
            by_priority: priority_counts(&by_priority),
            overdue: defect_views(overdue),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a defect scoped to the caller. Missing and not-owned rows both
/// come back as NotFound.
async fn find_own_defect(
    state: &AppState,
    user: &crate::middleware::auth::AuthUser,
    id: DbId,
) -> Result<Defect, AppError> {
    DefectRepo::find_by_id_for_assignee(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Defect",
                id,
            })
        })
}

/// Reject an assignee who does not exist or does not hold the engineer role.
pub(crate) async fn validate_assignee_role(
    state: &AppState,
    assignee_id: DbId,
) -> Result<(), AppError> {
    let assignee = UserRepo::find_by_id(&state.pool, assignee_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: assignee_id,
        })?;
    let role = Role::parse(&assignee.role)
        .ok_or_else(|| CoreError::Internal(format!("Unknown stored role: {}", assignee.role)))?;
    snagtrack_core::lifecycle::validate_assignee(role)?;
    Ok(())
}

/// Record a completed domain action in the audit trail.
pub(crate) async fn record_domain_event(
    state: &AppState,
    user: &crate::middleware::auth::AuthUser,
    action: &str,
    operation: String,
) {
    state
        .audit
        .record(AuditEvent {
            timestamp: Utc::now(),
            user_id: Some(user.user_id),
            username: Some(user.username.clone()),
            action: action.to_string(),
            operation,
            outcome: outcomes::OK.to_string(),
            ip_address: None,
        })
        .await;
}
