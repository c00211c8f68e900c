//! Defect attachment metadata model.

use serde::Serialize;
use snagtrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Attachment metadata row. File bytes live with external storage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DefectAttachment {
    pub id: DbId,
    pub defect_id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_by: DbId,
    pub uploaded_at: Timestamp,
}

/// DTO for appending an attachment record.
#[derive(Debug)]
pub struct CreateAttachment {
    pub defect_id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_by: DbId,
}
