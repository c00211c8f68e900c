//! Project entity model and DTOs.

use serde::Serialize;
use snagtrack_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// Full project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub created_by: DbId,
    pub manager_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for inserting a project. Text fields arrive already sanitized and
/// the date-range / manager-role invariants already validated.
#[derive(Debug)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub created_by: DbId,
    pub manager_id: DbId,
}
