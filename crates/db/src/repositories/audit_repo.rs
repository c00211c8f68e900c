//! Repository for the `audit_logs` table. Insert and query only; audit
//! entries are never updated or deleted.

use snagtrack_core::audit::AuditEvent;
use snagtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::AuditLog;

const COLUMNS: &str =
    "id, timestamp, user_id, username, action, operation, outcome, ip_address, created_at";

/// Provides append and query operations for the audit trail.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an audit entry.
    pub async fn insert(pool: &PgPool, event: &AuditEvent) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO audit_logs (timestamp, user_id, username, action, operation, outcome, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.timestamp)
        .bind(event.user_id)
        .bind(&event.username)
        .bind(&event.action)
        .bind(&event.operation)
        .bind(&event.outcome)
        .bind(&event.ip_address)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The most recent audit entries, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Audit entries for one user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM audit_logs WHERE user_id = $1 ORDER BY id DESC LIMIT $2");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
