use std::sync::Arc;

use snagtrack_core::audit::AuditSink;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: snagtrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Audit sink for authorization decisions and domain actions.
    /// Injected so tests can substitute their own destination.
    pub audit: Arc<dyn AuditSink>,
}
