//! Defect entity model and DTOs.

use serde::Serialize;
use snagtrack_core::reporting;
use snagtrack_core::status::DefectStatus;
use snagtrack_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// Full defect row from the `defects` table.
///
/// `status` and `priority` are TEXT in the schema; they always hold a value
/// from the core vocabularies because every write path parses them first.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Defect {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub project_id: DbId,
    pub status: String,
    pub priority: String,
    pub assigned_to: DbId,
    pub created_by: DbId,
    pub deadline: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Defect {
    /// Overdue on `today`: past deadline while not closed/cancelled.
    /// Computed, never stored.
    pub fn is_overdue(&self, today: Date) -> bool {
        match DefectStatus::parse(&self.status) {
            Some(status) => reporting::is_overdue(self.deadline, status, today),
            // Unknown status cannot occur through write paths; treat as open.
            None => self.deadline < today,
        }
    }
}

/// DTO for inserting a defect. Text fields arrive already sanitized and all
/// lifecycle invariants already validated.
#[derive(Debug)]
pub struct CreateDefect {
    pub title: String,
    pub description: String,
    pub project_id: DbId,
    pub status: String,
    pub priority: String,
    pub assigned_to: DbId,
    pub created_by: DbId,
    pub deadline: Date,
}

/// DTO for the assigned engineer's update. `None` fields keep the stored
/// value.
#[derive(Debug, Default)]
pub struct UpdateDefect {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<DbId>,
    pub deadline: Option<Date>,
}

/// DTO for the manager's assignment operation. Never touches status.
#[derive(Debug)]
pub struct AssignDefect {
    pub assigned_to: DbId,
    pub deadline: Date,
    pub priority: String,
}
