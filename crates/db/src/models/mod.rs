//! Entity models and DTOs, one module per table family.

pub mod attachment;
pub mod audit;
pub mod comment;
pub mod defect;
pub mod project;
pub mod report;
pub mod stats;
pub mod task;
pub mod user;
pub mod session;
