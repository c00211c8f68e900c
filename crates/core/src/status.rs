//! Status and priority vocabularies for defects and tasks.
//!
//! Values are stored as TEXT and constrained by CHECK constraints in the
//! migrations. `label()` is the human-readable form used as the key in
//! aggregation results.

use serde::{Deserialize, Serialize};

/// Defect (and task) lifecycle status.
///
/// `Closed` and `Cancelled` are terminal for overdue purposes; the
/// transition model itself is permissive (see `lifecycle`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectStatus {
    New,
    InProgress,
    Checking,
    Closed,
    Cancelled,
}

impl DefectStatus {
    pub const ALL: [DefectStatus; 5] = [
        DefectStatus::New,
        DefectStatus::InProgress,
        DefectStatus::Checking,
        DefectStatus::Closed,
        DefectStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DefectStatus::New => "new",
            DefectStatus::InProgress => "in_progress",
            DefectStatus::Checking => "checking",
            DefectStatus::Closed => "closed",
            DefectStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable label used as the key in stats dictionaries.
    pub fn label(self) -> &'static str {
        match self {
            DefectStatus::New => "New",
            DefectStatus::InProgress => "In progress",
            DefectStatus::Checking => "Checking",
            DefectStatus::Closed => "Closed",
            DefectStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<DefectStatus> {
        DefectStatus::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Terminal states are excluded from the overdue and open sets.
    pub fn is_terminal(self) -> bool {
        matches!(self, DefectStatus::Closed | DefectStatus::Cancelled)
    }
}

impl std::fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defect priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Human-readable label used as the key in stats dictionaries.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        Priority::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
