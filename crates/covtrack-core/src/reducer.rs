//! Coverage reducer: single-pass folds over window-ordered test runs.
//!
//! Rows arrive grouped by (partition, component, suite, file) and newest
//! first within a group (see [`crate::window`]). The newest row of a group is its
//! latest state and is the only one that counts towards the sums. Older rows
//! of the same group only move the `first_total` baseline: each one takes
//! back the previous row's contribution and puts in its own, so once the
//! group is consumed the baseline holds the oldest in-window run.
//!
//! Folds keep their state in a local accumulator, so one query's fold never
//! sees another's rows.

use crate::model::{AggregatedCoverage, ComponentRun, TestCoverage, TestRun};
use crate::window::ScopeAxis;
use std::collections::BTreeMap;

/// Accumulator for the scope-keyed fold (areas of a product, features of an area).
#[derive(Debug)]
pub struct CoverageFold<'a> {
    axis: ScopeAxis,
    coverage: BTreeMap<i64, AggregatedCoverage>,
    prev: Option<&'a TestRun>,
}

impl<'a> CoverageFold<'a> {
    pub fn new(axis: ScopeAxis) -> Self {
        Self {
            axis,
            coverage: BTreeMap::new(),
            prev: None,
        }
    }

    pub fn push(&mut self, run: &'a TestRun) {
        let axis = self.axis;
        let is_new_group = self
            .prev
            .map_or(true, |prev| !axis.same_partition(prev, run) || !prev.same_group(run));
        let key = self.axis.key(run);

        match self.coverage.get_mut(&key) {
            None => {
                let mut agg = AggregatedCoverage {
                    scope_key: key,
                    ..AggregatedCoverage::default()
                };
                agg.stats.add_latest(run);
                agg.stats.first_total = run.first_total_contribution();
                tally(&mut agg, run);
                self.coverage.insert(key, agg);
            }
            Some(agg) if is_new_group => {
                agg.stats.add_latest(run);
                agg.stats.first_total += run.first_total_contribution();
                tally(agg, run);
            }
            Some(agg) => {
                // Older run of the group `prev` already represents.
                if let Some(prev) = self.prev {
                    agg.stats.first_total +=
                        run.first_total_contribution() - prev.first_total_contribution();
                }
                tally(agg, run);
            }
        }

        self.prev = Some(run);
    }

    pub fn finish(self) -> BTreeMap<i64, AggregatedCoverage> {
        self.coverage
    }
}

fn tally(agg: &mut AggregatedCoverage, run: &TestRun) {
    agg.total_test_runs += 1;
    if run.failures > 0 {
        agg.failed_test_runs += 1;
    }
}

/// Fold window rows into one aggregate per scope key.
///
/// Keys with no rows are absent from the result.
pub fn reduce_coverage<'a, I>(axis: ScopeAxis, rows: I) -> BTreeMap<i64, AggregatedCoverage>
where
    I: IntoIterator<Item = &'a TestRun>,
{
    let mut fold = CoverageFold::new(axis);
    for run in rows {
        fold.push(run);
    }
    let coverage = fold.finish();
    tracing::debug!(axis = ?axis, scopes = coverage.len(), "Reduced window coverage");
    coverage
}

/// Fold window rows into one entry per (partition, component, suite, file) group.
///
/// Each entry is the group's latest run with its run counts and baseline.
pub fn reduce_test_listing<'a, I>(axis: ScopeAxis, rows: I) -> Vec<TestCoverage>
where
    I: IntoIterator<Item = &'a TestRun>,
{
    let mut tests: Vec<TestCoverage> = Vec::new();
    let mut prev: Option<&TestRun> = None;

    for run in rows {
        let continues = prev
            .filter(|p| axis.same_partition(p, run) && p.same_group(run));
        match (continues, tests.last_mut()) {
            (Some(p), Some(entry)) => {
                entry.first_total += run.first_total_contribution() - p.first_total_contribution();
                entry.total_test_runs += 1;
                if run.failures > 0 {
                    entry.failed_test_runs += 1;
                }
            }
            _ => tests.push(TestCoverage {
                run: run.clone(),
                total_test_runs: 1,
                failed_test_runs: i64::from(run.failures > 0),
                first_total: run.first_total_contribution(),
            }),
        }
        prev = Some(run);
    }

    tests
}

/// Roll window rows ordered by (component, product, suite, file, testrun DESC)
/// up into one entry per component.
pub fn reduce_components<'a, I>(rows: I) -> Vec<ComponentRun>
where
    I: IntoIterator<Item = &'a TestRun>,
{
    let mut components: Vec<ComponentRun> = Vec::new();
    let mut prev: Option<&TestRun> = None;

    for run in rows {
        let new_group = prev.map_or(true, |p| p.product_id != run.product_id || !p.same_group(run));
        let same_component = components.last().is_some_and(|c| c.name == run.component);

        if !same_component {
            components.push(ComponentRun {
                name: run.component.clone(),
                test_run: run.test_run,
                total: 0,
                passes: 0,
                pending: 0,
                failures: 0,
                skipped: 0,
            });
        }
        if let Some(c) = components.last_mut() {
            if run.test_run > c.test_run {
                c.test_run = run.test_run;
            }
            if new_group || !same_component {
                c.total += run.total;
                c.passes += run.passes;
                c.pending += run.pending;
                c.failures += run.failures;
                c.skipped += run.skipped;
            }
        }
        prev = Some(run);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    struct RunSpec<'s> {
        area: i64,
        feature: i64,
        component: &'s str,
        suite: &'s str,
        file: &'s str,
        days_ago: i64,
        total: i64,
        failures: i64,
        is_first: bool,
    }

    fn run(s: RunSpec<'_>) -> TestRun {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        TestRun {
            id: 0,
            product_id: 1,
            area_id: Some(s.area),
            feature_id: Some(s.feature),
            component: s.component.into(),
            suite: s.suite.into(),
            file_name: s.file.into(),
            url: String::new(),
            total: s.total,
            passes: s.total - s.failures,
            pending: 0,
            failures: s.failures,
            skipped: 0,
            uuid: format!("{}-{}-{}", s.suite, s.file, s.days_ago),
            is_first: s.is_first,
            test_run: now - Duration::days(s.days_ago),
        }
    }

    fn login(days_ago: i64, total: i64, failures: i64, is_first: bool) -> TestRun {
        run(RunSpec {
            area: 1,
            feature: 10,
            component: "ui",
            suite: "login",
            file: "a.spec",
            days_ago,
            total,
            failures,
            is_first,
        })
    }

    #[test]
    fn latest_run_wins_and_first_upload_baseline_is_zero() {
        let rows = vec![login(1, 12, 0, false), login(20, 10, 2, true)];
        let cov = reduce_coverage(ScopeAxis::Area, &rows);
        let agg = cov[&1];
        assert_eq!(agg.stats.total, 12);
        assert_eq!(agg.stats.failures, 0);
        assert_eq!(agg.stats.first_total, 0);
        assert_eq!(agg.total_test_runs, 2);
        assert_eq!(agg.failed_test_runs, 1);
    }

    #[test]
    fn baseline_is_oldest_total_when_not_first_upload() {
        let rows = vec![login(1, 12, 0, false), login(20, 10, 2, false)];
        let cov = reduce_coverage(ScopeAxis::Area, &rows);
        assert_eq!(cov[&1].stats.first_total, 10);
        assert_eq!(cov[&1].stats.total, 12);
    }

    #[test]
    fn baseline_walks_back_through_three_runs() {
        let rows = vec![
            login(3, 9, 0, false),
            login(15, 8, 0, false),
            login(25, 5, 0, false),
        ];

        let mut fold = CoverageFold::new(ScopeAxis::Area);
        fold.push(&rows[0]);
        assert_eq!(fold.coverage[&1].stats.first_total, 9);
        fold.push(&rows[1]);
        assert_eq!(fold.coverage[&1].stats.first_total, 8);
        fold.push(&rows[2]);
        let cov = fold.finish();
        assert_eq!(cov[&1].stats.first_total, 5);
        assert_eq!(cov[&1].stats.total, 9);
    }

    #[test]
    fn groups_in_same_scope_are_summed() {
        let rows = vec![
            run(RunSpec {
                area: 1,
                feature: 10,
                component: "api",
                suite: "orders",
                file: "o.spec",
                days_ago: 2,
                total: 4,
                failures: 1,
                is_first: false,
            }),
            run(RunSpec {
                area: 1,
                feature: 10,
                component: "api",
                suite: "orders",
                file: "o.spec",
                days_ago: 9,
                total: 3,
                failures: 0,
                is_first: false,
            }),
            login(1, 12, 0, false),
            login(20, 10, 2, true),
            run(RunSpec {
                area: 2,
                feature: 20,
                component: "ui",
                suite: "cart",
                file: "c.spec",
                days_ago: 5,
                total: 7,
                failures: 0,
                is_first: true,
            }),
        ];

        let cov = reduce_coverage(ScopeAxis::Area, &rows);
        assert_eq!(cov.len(), 2);

        let a1 = cov[&1];
        assert_eq!(a1.stats.total, 4 + 12);
        assert_eq!(a1.stats.failures, 1);
        assert_eq!(a1.stats.first_total, 3);
        assert_eq!(a1.total_test_runs, 4);

        let a2 = cov[&2];
        assert_eq!(a2.stats.total, 7);
        assert_eq!(a2.stats.first_total, 0);
    }

    fn shared(feature: i64, days_ago: i64, total: i64) -> TestRun {
        run(RunSpec {
            area: 1,
            feature,
            component: "ui",
            suite: "checkout",
            file: "shared.spec",
            days_ago,
            total,
            failures: 0,
            is_first: false,
        })
    }

    #[test]
    fn shared_file_counts_once_per_feature_in_area() {
        // Pay (10) ran the file 20 and 1 days ago, Refund (11) 10 days ago.
        let rows = vec![shared(10, 1, 5), shared(10, 20, 4), shared(11, 10, 7)];
        assert!(crate::window::is_window_ordered(ScopeAxis::Area, &rows));

        let cov = reduce_coverage(ScopeAxis::Area, &rows);
        let area = cov[&1];
        assert_eq!(area.stats.total, 5 + 7);
        assert_eq!(area.stats.first_total, 4 + 7);
        assert_eq!(area.total_test_runs, 3);

        let by_feature = reduce_coverage(ScopeAxis::Feature, &rows);
        assert_eq!(
            area.stats.total,
            by_feature[&10].stats.total + by_feature[&11].stats.total
        );

        let listing = reduce_test_listing(ScopeAxis::Area, &rows);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].run.total, 5);
        assert_eq!(listing[0].first_total, 4);
        assert_eq!(listing[1].run.feature_id, Some(11));
    }

    #[test]
    fn empty_window_yields_no_scopes() {
        let rows: Vec<TestRun> = Vec::new();
        assert!(reduce_coverage(ScopeAxis::Feature, &rows).is_empty());
        assert!(reduce_test_listing(ScopeAxis::Feature, &rows).is_empty());
        assert!(reduce_components(&rows).is_empty());
    }

    #[test]
    fn listing_counts_runs_per_group() {
        let rows = vec![
            login(1, 12, 0, false),
            login(5, 11, 3, false),
            login(20, 10, 2, false),
            run(RunSpec {
                area: 1,
                feature: 10,
                component: "ui",
                suite: "login",
                file: "b.spec",
                days_ago: 4,
                total: 2,
                failures: 0,
                is_first: true,
            }),
        ];

        let listing = reduce_test_listing(ScopeAxis::Feature, &rows);
        assert_eq!(listing.len(), 2);

        assert_eq!(listing[0].run.file_name, "a.spec");
        assert_eq!(listing[0].run.total, 12);
        assert_eq!(listing[0].total_test_runs, 3);
        assert_eq!(listing[0].failed_test_runs, 2);
        assert_eq!(listing[0].first_total, 10);

        assert_eq!(listing[1].run.file_name, "b.spec");
        assert_eq!(listing[1].total_test_runs, 1);
        assert_eq!(listing[1].failed_test_runs, 0);
        assert_eq!(listing[1].first_total, 0);
    }

    #[test]
    fn listing_splits_same_file_in_different_scopes() {
        let mut other = login(2, 6, 0, false);
        other.feature_id = Some(11);
        let rows = vec![login(1, 12, 0, false), other];

        let listing = reduce_test_listing(ScopeAxis::Feature, &rows);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[1].run.total, 6);
    }

    #[test]
    fn components_take_latest_run_per_file() {
        let mut rows = vec![
            run(RunSpec {
                area: 1,
                feature: 10,
                component: "api",
                suite: "orders",
                file: "o.spec",
                days_ago: 2,
                total: 4,
                failures: 1,
                is_first: false,
            }),
            run(RunSpec {
                area: 1,
                feature: 10,
                component: "api",
                suite: "orders",
                file: "o.spec",
                days_ago: 9,
                total: 3,
                failures: 0,
                is_first: false,
            }),
            login(6, 12, 0, false),
            login(20, 10, 2, true),
        ];
        rows.push(run(RunSpec {
            area: 1,
            feature: 10,
            component: "ui",
            suite: "logout",
            file: "z.spec",
            days_ago: 1,
            total: 1,
            failures: 0,
            is_first: true,
        }));

        let components = reduce_components(&rows);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "api");
        assert_eq!(components[0].total, 4);
        assert_eq!(components[0].failures, 1);
        assert_eq!(components[1].name, "ui");
        assert_eq!(components[1].total, 13);
        assert_eq!(components[1].test_run, rows[4].test_run);
    }
}
