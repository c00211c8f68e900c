//! Write-time validation for the defect and task lifecycle.
//!
//! These predicates run before every persisting write; a failure surfaces a
//! [`CoreError::Validation`] to the caller and nothing is stored. The status
//! transition model is deliberately permissive: any status in the vocabulary
//! is accepted regardless of the current one, matching how re-checks and
//! reopens flow through the assigned engineer in practice.

use crate::error::CoreError;
use crate::roles::Role;
use crate::status::{DefectStatus, Priority};
use crate::types::Date;

/// Default priority applied when a defect is created without one.
pub const DEFAULT_PRIORITY: Priority = Priority::Medium;

/// Status every defect and task starts in.
pub const INITIAL_STATUS: DefectStatus = DefectStatus::New;

/// A defect's deadline must fall within its project's date range.
pub fn validate_deadline(
    project_start: Date,
    project_end: Date,
    deadline: Date,
) -> Result<(), CoreError> {
    if deadline < project_start {
        return Err(CoreError::Validation(
            "Deadline cannot be before the project start date".into(),
        ));
    }
    if deadline > project_end {
        return Err(CoreError::Validation(
            "Deadline cannot be after the project end date".into(),
        ));
    }
    Ok(())
}

/// A project's start date must not be after its end date.
pub fn validate_project_dates(start_date: Date, end_date: Date) -> Result<(), CoreError> {
    if start_date > end_date {
        return Err(CoreError::Validation(
            "Project start date cannot be after the end date".into(),
        ));
    }
    Ok(())
}

/// Defects and tasks may only be assigned to engineers.
pub fn validate_assignee(role: Role) -> Result<(), CoreError> {
    if role != Role::Engineer {
        return Err(CoreError::Validation(
            "Assignee must have the engineer role".into(),
        ));
    }
    Ok(())
}

/// A project's manager field must reference a user with the manager role.
pub fn validate_manager(role: Role) -> Result<(), CoreError> {
    if role != Role::Manager {
        return Err(CoreError::Validation(
            "Project manager must have the manager role".into(),
        ));
    }
    Ok(())
}

/// Parse a submitted status, rejecting anything outside the vocabulary.
pub fn parse_status(s: &str) -> Result<DefectStatus, CoreError> {
    DefectStatus::parse(s)
        .ok_or_else(|| CoreError::Validation(format!("Unknown status '{s}'")))
}

/// Parse a submitted priority, rejecting anything outside the vocabulary.
pub fn parse_priority(s: &str) -> Result<Priority, CoreError> {
    Priority::parse(s)
        .ok_or_else(|| CoreError::Validation(format!("Unknown priority '{s}'")))
}
