//! Persisted report records.

use serde::Serialize;
use snagtrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A saved report row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub report_type: String,
    pub generated_by: DbId,
    pub file_path: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a report. Text fields arrive already sanitized.
#[derive(Debug)]
pub struct CreateReport {
    pub title: String,
    pub description: String,
    pub report_type: String,
    pub generated_by: DbId,
    pub file_path: Option<String>,
}
