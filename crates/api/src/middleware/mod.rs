//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireEngineer`] -- Requires the `engineer` role.
//! - [`rbac::RequireManager`] -- Requires the `manager` role.
//! - [`rbac::RequireViewer`] -- Requires the `viewer` role.
//!
//! The `Require*` extractors run every request through the central
//! authorization gate and record the decision in the audit trail.

pub mod auth;
pub mod rbac;
