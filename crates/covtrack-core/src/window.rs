//! Windowed row reader contract.
//!
//! A window query returns every test run of one scope whose `testrun` lies
//! after `now - window_days`, sorted by
//!
//! ```text
//! <partition> ASC, component ASC, suite ASC, file ASC, testrun DESC
//! ```
//!
//! The partition is `area_id, feature_id` for product scopes and
//! `feature_id` for area and feature scopes, so a file shared by two
//! features of one area stays two groups.
//!
//! The reducer folds the rows in a single pass and silently produces wrong
//! baselines if this order is broken. [`is_window_ordered`] states the order
//! in Rust so tests can hold the SQL to it.

use crate::model::TestRun;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_WINDOW_DAYS: u32 = 28;

/// Which id a fold keys its aggregates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeAxis {
    Area,
    Feature,
}

impl ScopeAxis {
    /// Missing ids fold under key 0, which never matches a stored entity.
    pub fn key(self, run: &TestRun) -> i64 {
        self.dimension(run).unwrap_or(0)
    }

    pub(crate) fn dimension(self, run: &TestRun) -> Option<i64> {
        match self {
            ScopeAxis::Area => run.area_id,
            ScopeAxis::Feature => run.feature_id,
        }
    }

    /// Leading sort columns; groups never span two partitions.
    fn partition(self, run: &TestRun) -> (Option<i64>, Option<i64>) {
        match self {
            ScopeAxis::Area => (run.area_id, run.feature_id),
            ScopeAxis::Feature => (run.feature_id, None),
        }
    }

    pub(crate) fn same_partition(self, a: &TestRun, b: &TestRun) -> bool {
        self.partition(a) == self.partition(b)
    }

    fn partition_columns(self) -> &'static str {
        match self {
            ScopeAxis::Area => "area_id ASC, feature_id ASC",
            ScopeAxis::Feature => "feature_id ASC",
        }
    }
}

/// Entity a window query is rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "lowercase")]
pub enum WindowScope {
    /// All runs of a product, partitioned by area.
    Product(i64),
    /// All runs of an area, partitioned by feature.
    Area(i64),
    /// All runs of a single feature.
    Feature(i64),
}

impl WindowScope {
    pub fn id(self) -> i64 {
        match self {
            WindowScope::Product(id) | WindowScope::Area(id) | WindowScope::Feature(id) => id,
        }
    }

    /// Leading sort dimension, and the key coverage is aggregated under.
    pub fn axis(self) -> ScopeAxis {
        match self {
            WindowScope::Product(_) => ScopeAxis::Area,
            WindowScope::Area(_) | WindowScope::Feature(_) => ScopeAxis::Feature,
        }
    }

    pub(crate) fn filter_column(self) -> &'static str {
        match self {
            WindowScope::Product(_) => "product_id",
            WindowScope::Area(_) => "area_id",
            WindowScope::Feature(_) => "feature_id",
        }
    }

    /// ORDER BY clause for this scope. `id DESC` only breaks exact timestamp ties.
    pub fn order_by(self) -> String {
        format!(
            "{}, component ASC, suite ASC, file ASC, testrun DESC, id DESC",
            self.axis().partition_columns()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuery {
    pub scope: WindowScope,
    pub window_days: u32,
}

impl WindowQuery {
    pub fn new(scope: WindowScope) -> Self {
        Self {
            scope,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    /// Runs strictly after this instant are inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        window_cutoff(now, self.window_days)
    }
}

pub fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(window_days))
}

/// Compare two rows by the window sort key of `axis`.
pub fn window_order(axis: ScopeAxis, a: &TestRun, b: &TestRun) -> Ordering {
    axis.partition(a)
        .cmp(&axis.partition(b))
        .then_with(|| a.component.cmp(&b.component))
        .then_with(|| a.suite.cmp(&b.suite))
        .then_with(|| a.file_name.cmp(&b.file_name))
        .then_with(|| b.test_run.cmp(&a.test_run))
}

/// True if `rows` satisfy the sort key the reducer depends on.
pub fn is_window_ordered(axis: ScopeAxis, rows: &[TestRun]) -> bool {
    rows.windows(2)
        .all(|w| window_order(axis, &w[0], &w[1]) != Ordering::Greater)
}
