//! Route definitions for the `/viewer` surface (viewer role required).
//! All read-only.

use axum::routing::get;
use axum::Router;

use crate::handlers::viewer;
use crate::state::AppState;

/// Routes mounted at `/viewer`.
///
/// ```text
/// GET /projects    completion overview per project
/// GET /defects     latest defects + counts by status
/// GET /analytics   group counts + overdue list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(viewer::projects))
        .route("/defects", get(viewer::defects))
        .route("/analytics", get(viewer::analytics))
}
