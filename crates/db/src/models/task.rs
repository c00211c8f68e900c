//! Task entity model and DTOs. Same shape as a defect minus priority.

use serde::Serialize;
use snagtrack_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// Full task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub project_id: DbId,
    pub deadline: Date,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for inserting a task.
#[derive(Debug)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub project_id: DbId,
    pub deadline: Date,
    pub status: String,
    pub created_by: DbId,
}
