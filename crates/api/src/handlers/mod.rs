//! HTTP handlers, grouped by audience.
//!
//! - [`auth`] -- registration, login, token refresh, logout.
//! - [`engineer`] -- the assigned engineer's defect workflow.
//! - [`manager`] -- projects, assignment, tasks, reports.
//! - [`viewer`] -- read-only progress and analytics views.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use snagtrack_core::status::{DefectStatus, Priority};
use snagtrack_db::models::defect::Defect;
use snagtrack_db::models::stats::BucketCount;

pub mod auth;
pub mod engineer;
pub mod manager;
pub mod viewer;

/// A defect as returned by the API: the stored row plus the computed
/// overdue flag.
#[derive(Debug, Serialize)]
pub struct DefectView {
    #[serde(flatten)]
    pub defect: Defect,
    pub is_overdue: bool,
}

impl From<Defect> for DefectView {
    fn from(defect: Defect) -> Self {
        let is_overdue = defect.is_overdue(Utc::now().date_naive());
        DefectView { defect, is_overdue }
    }
}

/// Map defect rows to views in bulk.
pub(crate) fn defect_views(defects: Vec<Defect>) -> Vec<DefectView> {
    defects.into_iter().map(DefectView::from).collect()
}

/// Counts keyed by human-readable status label, zero-filled so every status
/// appears even when no row holds it.
pub(crate) fn status_counts(buckets: &[BucketCount]) -> BTreeMap<&'static str, i64> {
    let mut counts: BTreeMap<&'static str, i64> =
        DefectStatus::ALL.into_iter().map(|s| (s.label(), 0)).collect();
    for bucket in buckets {
        if let Some(status) = DefectStatus::parse(&bucket.bucket) {
            counts.insert(status.label(), bucket.count);
        }
    }
    counts
}

/// Counts keyed by human-readable priority label, zero-filled.
pub(crate) fn priority_counts(buckets: &[BucketCount]) -> BTreeMap<&'static str, i64> {
    let mut counts: BTreeMap<&'static str, i64> =
        Priority::ALL.into_iter().map(|p| (p.label(), 0)).collect();
    for bucket in buckets {
        if let Some(priority) = Priority::parse(&bucket.bucket) {
            counts.insert(priority.label(), bucket.count);
        }
    }
    counts
}
