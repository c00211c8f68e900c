//! Postgres-backed audit sink.

use snagtrack_core::audit::{AuditEvent, AuditSink};
use snagtrack_db::repositories::AuditLogRepo;
use snagtrack_db::DbPool;

/// Writes audit events to the `audit_logs` table.
///
/// A failed write is logged and swallowed: auditing must never block the
/// operation being audited.
pub struct PgAuditSink {
    pool: DbPool,
}

impl PgAuditSink {
    pub fn new(pool: DbPool) -> Self {
        PgAuditSink { pool }
    }
}

#[async_trait::async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, event: AuditEvent) {
        tracing::debug!(
            user_id = ?event.user_id,
            action = %event.action,
            operation = %event.operation,
            outcome = %event.outcome,
            "audit",
        );
        if let Err(err) = AuditLogRepo::insert(&self.pool, &event).await {
            tracing::error!(error = %err, "Failed to write audit log entry");
        }
    }
}
