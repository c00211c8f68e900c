pub mod auth;
pub mod engineer;
pub mod health;
pub mod manager;
pub mod viewer;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
/// /auth/refresh                          refresh (public)
/// /auth/logout                           logout (requires auth)
///
/// /engineer/defects                      list, create (engineer only)
/// /engineer/defects/{id}                 detail, update
/// /engineer/defects/{id}/comments        append comment
/// /engineer/defects/{id}/attachments     append attachment metadata
/// /engineer/stats                        own counts + overdue list
///
/// /manager/projects                      list, create (manager only)
/// /manager/projects/{id}                 project detail
/// /manager/defects                       list with filters
/// /manager/defects/{id}/assign           assignment (PUT)
/// /manager/tasks                         list, create
/// /manager/reports/summary               rollups
/// /manager/reports                       list, create report records
///
/// /viewer/projects                       completion overview (viewer only)
/// /viewer/defects                        latest defects + counts
/// /viewer/analytics                      group counts + overdue
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/engineer", engineer::router())
        .nest("/manager", manager::router())
        .nest("/viewer", viewer::router())
}
