//! Domain logic for the snagtrack defect-tracking backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API, and any future CLI tooling. It contains the
//! role/authorization policy, the defect lifecycle rules, read-side
//! aggregation math, input sanitization, and the audit-sink interface.

pub mod audit;
pub mod error;
pub mod lifecycle;
pub mod reporting;
pub mod roles;
pub mod sanitize;
pub mod status;
pub mod types;
