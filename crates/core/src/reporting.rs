//! Read-side aggregation math for dashboards and reports.
//!
//! Everything here is computed fresh per request over persisted rows; there
//! is no caching or incremental maintenance. The SQL grouping lives in the
//! repository layer; this module holds the pure arithmetic and the result
//! shapes shared between handlers.

use serde::Serialize;

use crate::status::DefectStatus;
use crate::types::{Date, DbId};

/// Completion rate as a percentage, with 0 when there are no defects.
pub fn completion_rate(closed: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    closed as f64 / total as f64 * 100.0
}

/// Whether a defect counts as overdue on the given day.
pub fn is_overdue(deadline: Date, status: DefectStatus, today: Date) -> bool {
    deadline < today && !status.is_terminal()
}

/// Defect counts for a single project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRollup {
    pub project_id: DbId,
    pub project_name: String,
    pub total_defects: i64,
    pub open_defects: i64,
    pub closed_defects: i64,
    pub completion_rate: f64,
}

impl ProjectRollup {
    pub fn new(
        project_id: DbId,
        project_name: String,
        total: i64,
        open: i64,
        closed: i64,
    ) -> Self {
        ProjectRollup {
            project_id,
            project_name,
            total_defects: total,
            open_defects: open,
            closed_defects: closed,
            completion_rate: completion_rate(closed, total),
        }
    }
}

/// Defect counts across all projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalRollup {
    pub total_defects: i64,
    pub open_defects: i64,
    pub closed_defects: i64,
}

impl GlobalRollup {
    /// Sum per-project rollups into the global totals.
    pub fn from_projects(projects: &[ProjectRollup]) -> Self {
        let mut rollup = GlobalRollup::default();
        for p in projects {
            rollup.total_defects += p.total_defects;
            rollup.open_defects += p.open_defects;
            rollup.closed_defects += p.closed_defects;
        }
        rollup
    }
}

/// A single `(label, count)` bucket from a grouped count query.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}
