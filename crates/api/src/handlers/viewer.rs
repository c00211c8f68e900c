//! Handlers for the `/viewer` surface: read-only progress and analytics
//! views. Nothing here writes.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use snagtrack_core::lifecycle::parse_status;
use snagtrack_core::reporting::{GlobalRollup, GroupCount, ProjectRollup};
use snagtrack_db::models::stats::ProjectRollupRow;
use snagtrack_db::repositories::DefectRepo;

use crate::error::AppResult;
use crate::handlers::{defect_views, priority_counts, status_counts, DefectView};
use crate::middleware::rbac::RequireViewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of defects shown on the progress view.
const RECENT_DEFECT_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /viewer/defects`.
#[derive(Debug, Deserialize)]
pub struct ViewerDefectQuery {
    pub status: Option<String>,
}

/// Response for `GET /viewer/projects`.
#[derive(Debug, Serialize)]
pub struct ViewerProjects {
    pub projects: Vec<ProjectRollup>,
    pub totals: GlobalRollup,
}

/// Response for `GET /viewer/defects`.
#[derive(Debug, Serialize)]
pub struct ViewerDefects {
    pub recent: Vec<DefectView>,
    pub total_defects: i64,
    pub by_status: BTreeMap<&'static str, i64>,
}

/// Response for `GET /viewer/analytics`.
#[derive(Debug, Serialize)]
pub struct ViewerAnalytics {
    pub by_status: BTreeMap<&'static str, i64>,
    pub by_priority: BTreeMap<&'static str, i64>,
    pub by_project: Vec<GroupCount>,
    pub overdue: Vec<DefectView>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/viewer/projects
///
/// Per-project completion overview plus global totals.
pub async fn projects(
    State(state): State<AppState>,
    RequireViewer(_user): RequireViewer,
) -> AppResult<Json<DataResponse<ViewerProjects>>> {
    let rollup_rows = DefectRepo::project_rollups(&state.pool).await?;
    let projects: Vec<ProjectRollup> = rollup_rows.into_iter().map(to_rollup).collect();
    let totals = GlobalRollup::from_projects(&projects);
    Ok(Json(DataResponse {
        data: ViewerProjects { projects, totals },
    }))
}

/// GET /api/v1/viewer/defects
///
/// The latest defects plus the total and counts by status. A status filter
/// narrows the list and the counts alike.
pub async fn defects(
    State(state): State<AppState>,
    RequireViewer(_user): RequireViewer,
    Query(query): Query<ViewerDefectQuery>,
) -> AppResult<Json<DataResponse<ViewerDefects>>> {
    let status = match &query.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    let recent = match status {
        Some(s) => {
            let mut defects = DefectRepo::list_all(&state.pool, Some(s.as_str()), None).await?;
            defects.truncate(RECENT_DEFECT_LIMIT as usize);
            defects
        }
        None => DefectRepo::list_recent(&state.pool, RECENT_DEFECT_LIMIT).await?,
    };
    let by_status =
        DefectRepo::counts_by_status(&state.pool, None, status.map(|s| s.as_str())).await?;
    let total_defects = by_status.iter().map(|b| b.count).sum();

    Ok(Json(DataResponse {
        data: ViewerDefects {
            recent: defect_views(recent),
            total_defects,
            by_status: status_counts(&by_status),
        },
    }))
}

/// GET /api/v1/viewer/analytics
///
/// Group counts by status, priority, and project, plus the overdue list.
pub async fn analytics(
    State(state): State<AppState>,
    RequireViewer(_user): RequireViewer,
) -> AppResult<Json<DataResponse<ViewerAnalytics>>> {
    let by_status = DefectRepo::counts_by_status(&state.pool, None, None).await?;
    let by_priority = DefectRepo::counts_by_priority(&state.pool, None).await?;
    let by_project = DefectRepo::counts_by_project(&state.pool).await?;
    let overdue = DefectRepo::list_overdue(&state.pool, None).await?;

    Ok(Json(DataResponse {
        data: ViewerAnalytics {
            by_status: status_counts(&by_status),
            by_priority: priority_counts(&by_priority),
            by_project: by_project
                .into_iter()
                .map(|b| GroupCount {
                    label: b.bucket,
                    count: b.count,
                })
                .collect(),
            overdue: defect_views(overdue),
        },
    }))
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
