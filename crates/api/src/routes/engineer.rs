//! Route definitions for the `/engineer` surface (engineer role required).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::engineer;
use crate::state::AppState;

/// Routes mounted at `/engineer`.
///
/// ```text
/// GET  /defects                   own defects, ?status= filter
/// POST /defects                   create defect
/// GET  /defects/{id}              own defect with comments + attachments
/// PUT  /defects/{id}              lifecycle update
/// POST /defects/{id}/comments     append comment
/// POST /defects/{id}/attachments  append attachment metadata
/// GET  /stats                     own counts + overdue list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/defects",
            get(engineer::list_defects).post(engineer::create_defect),
        )
        .route(
            "/defects/{id}",
            get(engineer::get_defect).put(engineer::update_defect),
        )
        .route("/defects/{id}/comments", post(engineer::add_comment))
        .route("/defects/{id}/attachments", post(engineer::add_attachment))
        .route("/stats", get(engineer::stats))
}
