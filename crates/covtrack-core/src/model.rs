//! Stored entities and the coverage shapes returned to callers.
//!
//! JSON field names are kebab-case (`product-id`, `first-total`, ...) so
//! existing UI clients keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Product {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Area {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Feature {
    pub id: i64,
    pub area_id: i64,
    pub name: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub business_value: String,
}

/// Feature fields supplied on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewFeature {
    pub area_id: i64,
    pub name: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub business_value: String,
}

/// One stored execution of a (component, suite, file) unit.
///
/// Rows are immutable once inserted. `is_first` is decided at insert time
/// and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestRun {
    pub id: i64,
    pub product_id: i64,
    #[serde(with = "zero_id")]
    pub area_id: Option<i64>,
    #[serde(with = "zero_id")]
    pub feature_id: Option<i64>,
    pub component: String,
    pub suite: String,
    pub file_name: String,
    pub url: String,
    pub total: i64,
    pub passes: i64,
    pub pending: i64,
    pub failures: i64,
    pub skipped: i64,
    pub uuid: String,
    pub is_first: bool,
    pub test_run: DateTime<Utc>,
}

impl TestRun {
    /// What this run adds to a window's `first_total` baseline.
    ///
    /// A run that is the first upload of its tuple ever has no earlier state
    /// to compare against, so it contributes nothing.
    pub fn first_total_contribution(&self) -> i64 {
        if self.is_first {
            0
        } else {
            self.total
        }
    }

    pub fn same_group(&self, other: &TestRun) -> bool {
        self.component == other.component
            && self.suite == other.suite
            && self.file_name == other.file_name
    }
}

/// Runs without an area or feature carry `0` on the wire; ids start at 1.
mod zero_id {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(id.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let id = Option::<i64>::deserialize(deserializer)?;
        Ok(id.filter(|id| *id != 0))
    }
}

/// Test run fields supplied on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestRun {
    pub product_id: i64,
    pub area_id: Option<i64>,
    pub feature_id: Option<i64>,
    pub component: String,
    pub suite: String,
    pub file_name: String,
    pub url: String,
    pub total: i64,
    pub passes: i64,
    pub pending: i64,
    pub failures: i64,
    pub skipped: i64,
    pub uuid: String,
    pub is_first: bool,
    pub test_run: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExplTest {
    pub id: i64,
    pub area_id: i64,
    pub summary: String,
    pub rating: i64,
    pub test_run: DateTime<Utc>,
    pub tester: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewExplTest {
    pub area_id: i64,
    pub summary: String,
    pub rating: i64,
    pub test_run: DateTime<Utc>,
    #[serde(default)]
    pub tester: Option<i64>,
}

/// Count and average rating of an area's exploratory tests in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExplOverview {
    pub expl_tests: i64,
    pub expl_rating: f64,
}

/// Latest-run sums plus the window-start baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoverageStats {
    pub total: i64,
    pub passes: i64,
    pub pending: i64,
    pub failures: i64,
    pub skipped: i64,
    pub first_total: i64,
}

impl CoverageStats {
    pub(crate) fn add_latest(&mut self, run: &TestRun) {
        self.total += run.total;
        self.passes += run.passes;
        self.pending += run.pending;
        self.failures += run.failures;
        self.skipped += run.skipped;
    }
}

/// Reducer output for one scope key (an area id or a feature id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregatedCoverage {
    pub scope_key: i64,
    #[serde(flatten)]
    pub stats: CoverageStats,
    pub total_test_runs: i64,
    pub failed_test_runs: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AreaCoverage {
    #[serde(flatten)]
    pub area: Area,
    #[serde(flatten)]
    pub stats: CoverageStats,
    #[serde(flatten)]
    pub expl: ExplOverview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeatureCoverage {
    #[serde(flatten)]
    pub feature: Feature,
    #[serde(flatten)]
    pub stats: CoverageStats,
}

/// Latest run of one (component, suite, file) group with its window tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCoverage {
    #[serde(flatten)]
    pub run: TestRun,
    pub total_test_runs: i64,
    pub failed_test_runs: i64,
    pub first_total: i64,
}

/// A component with its most recent run and latest-run sums in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentRun {
    pub name: String,
    pub test_run: DateTime<Utc>,
    pub total: i64,
    pub passes: i64,
    pub pending: i64,
    pub failures: i64,
    pub skipped: i64,
}
