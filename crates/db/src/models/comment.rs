//! Defect comment model. Immutable once created.

use serde::Serialize;
use snagtrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A single comment on a defect. No update path exists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DefectComment {
    pub id: DbId,
    pub defect_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// DTO for appending a comment. Text arrives already sanitized; the author
/// is stamped from the session identity, never from the request body.
#[derive(Debug)]
pub struct CreateComment {
    pub defect_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
