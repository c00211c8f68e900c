//! Row shapes for aggregate queries.

use snagtrack_core::types::DbId;
use sqlx::FromRow;

/// One bucket of a grouped count, e.g. `("closed", 4)`.
#[derive(Debug, Clone, FromRow)]
pub struct BucketCount {
    pub bucket: String,
    pub count: i64,
}

/// Raw per-project defect counts before completion-rate computation.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRollupRow {
    pub project_id: DbId,
    pub project_name: String,
    pub total_defects: i64,
    pub open_defects: i64,
    pub closed_defects: i64,
}
