//! Handlers for the `/manager` surface: projects, assignment, tasks, and
//! reports.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use snagtrack_core::audit::actions;
use snagtrack_core::error::CoreError;
use snagtrack_core::lifecycle::{
    parse_priority, parse_status, validate_deadline, validate_manager, validate_project_dates,
    INITIAL_STATUS,
};
use snagtrack_core::reporting::{GlobalRollup, ProjectRollup};
use snagtrack_core::roles::Role;
use snagtrack_core::sanitize::escape_html;
use snagtrack_core::types::{Date, DbId};
use snagtrack_db::models::defect::AssignDefect;
use snagtrack_db::models::project::{CreateProject, Project};
use snagtrack_db::models::report::{CreateReport, Report};
use snagtrack_db::models::stats::ProjectRollupRow;
use snagtrack_db::models::task::{CreateTask, Task};
use snagtrack_db::repositories::{DefectRepo, ProjectRepo, ReportRepo, TaskRepo, UserRepo};

use crate::error::AppResult;
use crate::handlers::engineer::{record_domain_event, validate_assignee_role};
use crate::handlers::{defect_views, DefectView};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /manager/projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub manager_id: DbId,
}

/// Query string for `GET /manager/defects`.
#[derive(Debug, Deserialize)]
pub struct ManagerDefectQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Request body for `PUT /manager/defects/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignDefectRequest {
    pub assigned_to: DbId,
    pub deadline: Date,
    pub priority: String,
}

/// Query string for `GET /manager/tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
}

/// Request body for `POST /manager/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: DbId,
    pub project_id: DbId,
    pub deadline: Date,
}

/// Request body for `POST /manager/reports`.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub report_type: String,
    pub file_path: Option<String>,
}

/// One project with its defect rollup, as returned by the project list.
#[derive(Debug, Serialize)]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub project: Project,
    pub rollup: ProjectRollup,
}

/// Response for `GET /manager/projects`.
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectOverview>,
    pub totals: GlobalRollup,
}

/// Response for `GET /manager/projects/{id}`.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub rollup: ProjectRollup,
    pub defects: Vec<DefectView>,
    pub tasks: Vec<Task>,
}

/// Response for `GET /manager/reports/summary`.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub totals: GlobalRollup,
    pub projects: Vec<ProjectRollup>,
    pub overdue: Vec<DefectView>,
}

// ---------------------------------------------------------------------------
// Project handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/manager/projects
///
/// All projects with per-project defect stats and global totals.
pub async fn list_projects(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
) -> AppResult<Json<DataResponse<ProjectListResponse>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    let rollup_rows = DefectRepo::project_rollups(&state.pool).await?;
    let rollups: Vec<ProjectRollup> = rollup_rows.into_iter().map(to_rollup).collect();
    let totals = GlobalRollup::from_projects(&rollups);

    let overviews = projects
        .into_iter()
        .map(|project| {
            let rollup = rollups
                .iter()
                .find(|r| r.project_id == project.id)
                .cloned()
                .unwrap_or_else(|| {
                    ProjectRollup::new(project.id, project.name.clone(), 0, 0, 0)
                });
            ProjectOverview { project, rollup }
        })
        .collect();

    Ok(Json(DataResponse {
        data: ProjectListResponse {
            projects: overviews,
            totals,
        },
    }))
}

/// POST /api/v1/manager/projects
///
/// Create a project. The date range must be ordered and the manager field
/// must point at a user holding the manager role.
pub async fn create_project(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_project_dates(input.start_date, input.end_date)?;

    let manager = UserRepo::find_by_id(&state.pool, input.manager_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: input.manager_id,
        })?;
    let role = Role::parse(&manager.role)
        .ok_or_else(|| CoreError::Internal(format!("Unknown stored role: {}", manager.role)))?;
    validate_manager(role)?;

    let create = CreateProject {
        name: escape_html(&input.name),
        description: escape_html(&input.description),
        start_date: input.start_date,
        end_date: input.end_date,
        created_by: user.user_id,
        manager_id: input.manager_id,
    };
    let project = ProjectRepo::create(&state.pool, &create).await?;

    record_domain_event(
        &state,
        &user,
        actions::ENTITY_CREATE,
        format!("POST /api/v1/manager/projects#{}", project.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/manager/projects/{id}
///
/// One project with its defects, tasks, and rollup.
pub async fn get_project(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    let rollup = DefectRepo::rollup_for_project(&state.pool, id)
        .await?
        .map(to_rollup)
        .unwrap_or_else(|| ProjectRollup::new(project.id, project.name.clone(), 0, 0, 0));
    let defects = DefectRepo::list_for_project(&state.pool, id).await?;
    let tasks = TaskRepo::list_for_project(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            rollup,
            defects: defect_views(defects),
            tasks,
        },
    }))
}

// ---------------------------------------------------------------------------
// Defect handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/manager/defects
///
/// All defects, newest first, optionally filtered by status and priority.
pub async fn list_defects(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Query(query): Query<ManagerDefectQuery>,
) -> AppResult<Json<DataResponse<Vec<DefectView>>>> {
    let status = match &query.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    let priority = match &query.priority {
        Some(p) => Some(parse_priority(p)?),
        None => None,
    };
    let defects = DefectRepo::list_all(
        &state.pool,
        status.map(|s| s.as_str()),
        priority.map(|p| p.as_str()),
    )
    .await?;
    Ok(Json(DataResponse {
        data: defect_views(defects),
    }))
}

/// PUT /api/v1/manager/defects/{id}/assign
///
/// Assign a defect: sets assignee, deadline, and priority. The status is
/// never touched by assignment. The assignee must hold the engineer role
/// and the deadline must fall inside the project's date range.
pub async fn assign_defect(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<AssignDefectRequest>,
) -> AppResult<Json<DataResponse<DefectView>>> {
    let defect = DefectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Defect",
            id,
        })?;

    validate_assignee_role(&state, input.assigned_to).await?;
    parse_priority(&input.priority)?;

    let project = ProjectRepo::find_by_id(&state.pool, defect.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: defect.project_id,
        })?;
    validate_deadline(project.start_date, project.end_date, input.deadline)?;

    let assign = AssignDefect {
        assigned_to: input.assigned_to,
        deadline: input.deadline,
        priority: input.priority,
    };
    let updated = DefectRepo::assign(&state.pool, id, &assign)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Defect",
            id,
        })?;

    record_domain_event(
        &state,
        &user,
        actions::DEFECT_ASSIGN,
        format!("PUT /api/v1/manager/defects/{id}/assign"),
    )
    .await;

    Ok(Json(DataResponse {
        data: DefectView::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// Task handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/manager/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let status = match &query.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    let tasks = TaskRepo::list(&state.pool, status.map(|s| s.as_str())).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/manager/tasks
///
/// Create a task assigned to an engineer. Tasks start in the initial
/// status, same vocabulary as defects, and the deadline must fall inside
/// the project's date range.
pub async fn create_task(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })?;
    validate_deadline(project.start_date, project.end_date, input.deadline)?;
    validate_assignee_role(&state, input.assigned_to).await?;

    let create = CreateTask {
        title: escape_html(&input.title),
        description: escape_html(&input.description),
        assigned_to: input.assigned_to,
        project_id: input.project_id,
        deadline: input.deadline,
        status: INITIAL_STATUS.as_str().to_string(),
        created_by: user.user_id,
    };
    let task = TaskRepo::create(&state.pool, &create).await?;

    record_domain_event(
        &state,
        &user,
        actions::ENTITY_CREATE,
        format!("POST /api/v1/manager/tasks#{}", task.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

// ---------------------------------------------------------------------------
// Report handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/manager/reports/summary
///
/// Global and per-project rollups plus the overdue list, computed fresh.
pub async fn reports_summary(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
) -> AppResult<Json<DataResponse<ReportSummary>>> {
    let rollup_rows = DefectRepo::project_rollups(&state.pool).await?;
    let projects: Vec<ProjectRollup> = rollup_rows.into_iter().map(to_rollup).collect();
    let totals = GlobalRollup::from_projects(&projects);
    let overdue = DefectRepo::list_overdue(&state.pool, None).await?;

    Ok(Json(DataResponse {
        data: ReportSummary {
            totals,
            projects,
            overdue: defect_views(overdue),
        },
    }))
}

/// GET /api/v1/manager/reports
pub async fn list_reports(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let reports = ReportRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// POST /api/v1/manager/reports
///
/// Persist a report record. Generation of the report file itself happens
/// elsewhere; only the metadata is stored here.
pub async fn create_report(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    let create = CreateReport {
        title: escape_html(&input.title),
        description: escape_html(&input.description),
        report_type: escape_html(&input.report_type),
        generated_by: user.user_id,
        file_path: input.file_path,
    };
    let report = ReportRepo::create(&state.pool, &create).await?;

    record_domain_event(
        &state,
        &user,
        actions::ENTITY_CREATE,
        format!("POST /api/v1/manager/reports#{}", report.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_rollup(row: ProjectRollupRow) -> ProjectRollup {
    ProjectRollup::new(
        row.project_id,
        row.project_name,
        row.total_defects,
        row.open_defects,
        row.closed_defects,
    )
}
