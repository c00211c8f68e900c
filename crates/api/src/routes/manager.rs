//! Route definitions for the `/manager` surface (manager role required).

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::manager;
use crate::state::AppState;

/// Routes mounted at `/manager`.
///
/// ```text
/// GET  /projects               all projects with rollups + totals
/// POST /projects               create project
/// GET  /projects/{id}          project detail with defects + tasks
/// GET  /defects                all defects, ?status=&priority= filters
/// PUT  /defects/{id}/assign    assignment
/// GET  /tasks                  all tasks, ?status= filter
/// POST /tasks                  create task
/// GET  /reports/summary        global + per-project rollups
/// GET  /reports                persisted report records
/// POST /reports                persist a report record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(manager::list_projects).post(manager::create_project),
        )
        .route("/projects/{id}", get(manager::get_project))
        .route("/defects", get(manager::list_defects))
        .route("/defects/{id}/assign", put(manager::assign_defect))
        .route("/tasks", get(manager::list_tasks).post(manager::create_task))
        .route("/reports/summary", get(manager::reports_summary))
        .route(
            "/reports",
            get(manager::list_reports).post(manager::create_report),
        )
}
