//! Audit log model. Append-only, no updated_at.

use serde::Serialize;
use snagtrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub action: String,
    pub operation: String,
    pub outcome: String,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}
