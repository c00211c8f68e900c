//! Audit constants and the audit-sink interface.
//!
//! The authorization gate and the lifecycle handlers record through an
//! injected [`AuditSink`] rather than a process-wide logger, so tests can
//! substitute their own sink and the storage backend stays swappable.

use crate::types::{DbId, Timestamp};

/// Known action types for audit entries.
pub mod actions {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const REGISTER: &str = "register";
    pub const AUTHZ_CHECK: &str = "authz_check";
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const DEFECT_ASSIGN: &str = "defect_assign";
}

/// Outcomes as recorded in the audit trail. The first three come from the
/// authorization gate; `OK` marks a completed domain action.
pub mod outcomes {
    pub const PASS: &str = "pass";
    pub const REDIRECT_LOGIN: &str = "redirect_login";
    pub const DENIED: &str = "denied";
    pub const OK: &str = "ok";
}

/// A single audit record. Immutable once written.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub timestamp: Timestamp,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    /// One of the [`actions`] constants.
    pub action: String,
    /// Target operation, e.g. `"GET /api/v1/engineer/defects"`.
    pub operation: String,
    /// One of the [`outcomes`] constants.
    pub outcome: String,
    pub ip_address: Option<String>,
}

impl AuditEvent {
    /// Build an authorization-gate event with the current timestamp.
    pub fn authz(
        user_id: Option<DbId>,
        username: Option<String>,
        operation: String,
        outcome: &str,
        ip_address: Option<String>,
    ) -> Self {
        AuditEvent {
            timestamp: chrono::Utc::now(),
            user_id,
            username,
            action: actions::AUTHZ_CHECK.to_string(),
            operation,
            outcome: outcome.to_string(),
            ip_address,
        }
    }
}

/// Destination for audit records.
///
/// Implementations must be infallible from the caller's perspective: a
/// failing sink logs its own error and never blocks the gated operation.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Sink that discards everything. Useful in unit tests.
pub struct NullAuditSink;

#[async_trait::async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, _event: AuditEvent) {}
}
