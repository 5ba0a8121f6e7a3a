//! CoverageStore: SQLite-backed persistence for coverage tracking.
//!
//! Provides:
//! - CRUD for products, areas, features and exploratory tests
//! - Append-only test run log with uuid dedupe and first-upload detection
//! - Window reads in the order the reducer depends on
//! - Dependency-ordered cascade deletes

use super::schema::COVERAGE_SCHEMA;
use super::store_internal::{areas, cascade, expl_tests, features, products, test_runs};
use crate::errors::CoverageError;
use crate::model::{
    Area, ExplOverview, ExplTest, Feature, NewExplTest, NewFeature, NewTestRun, Product, TestRun,
};
use crate::window::WindowQuery;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identity of a test unit across runs: (component, suite, file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunGroup {
    pub component: String,
    pub suite: String,
    pub file: String,
}

impl RunGroup {
    pub fn new(
        component: impl Into<String>,
        suite: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            suite: suite.into(),
            file: file.into(),
        }
    }
}

/// SQLite-backed coverage store. Cloning shares the connection.
#[derive(Clone)]
pub struct CoverageStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for CoverageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageStore").finish_non_exhaustive()
    }
}

fn require_name(kind: &str, name: &str) -> Result<(), CoverageError> {
    if name.trim().is_empty() {
        return Err(CoverageError::validation(format!("{kind} name must not be empty")));
    }
    Ok(())
}

impl CoverageStore {
    /// Open a file-backed store.
    pub fn open(path: &Path) -> Result<Self, CoverageError> {
        let conn = Connection::open(path)?;
        Self::init_connection(&conn)?;
        tracing::debug!(path = %path.display(), "Opened coverage store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> Result<Self, CoverageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create store from existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self, CoverageError> {
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_connection(conn: &Connection) -> Result<(), CoverageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        // WAL mode for file-backed DBs (no-op for in-memory)
        let _ = conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()));
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;
        conn.execute_batch(COVERAGE_SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoverageError> {
        self.conn
            .lock()
            .map_err(|_| CoverageError::Database("connection mutex poisoned".to_string()))
    }

    // --- products ---

    pub fn insert_product(&self, name: &str) -> Result<Product, CoverageError> {
        require_name("product", name)?;
        let conn = self.lock()?;
        let product = products::insert_product_impl(&conn, name)?;
        tracing::info!(product_id = product.id, "Inserted product");
        Ok(product)
    }

    pub fn list_products(&self) -> Result<Vec<Product>, CoverageError> {
        let conn = self.lock()?;
        Ok(products::list_products_impl(&conn)?)
    }

    pub fn get_product(&self, id: i64) -> Result<Option<Product>, CoverageError> {
        let conn = self.lock()?;
        Ok(products::get_product_impl(&conn, id)?)
    }

    pub fn rename_product(&self, id: i64, name: &str) -> Result<Product, CoverageError> {
        require_name("product", name)?;
        let conn = self.lock()?;
        if products::rename_product_impl(&conn, id, name)? == 0 {
            return Err(CoverageError::not_found("Product", id));
        }
        Ok(Product {
            id,
            name: name.to_string(),
        })
    }

    /// Delete a product with all its areas, features, runs and exploratory tests.
    pub fn delete_product(&self, id: i64) -> Result<(), CoverageError> {
        let conn = self.lock()?;
        let deleted = cascade::in_txn(&conn, |c| cascade::delete_product_impl(c, id))?;
        if deleted == 0 {
            return Err(CoverageError::not_found("Product", id));
        }
        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    // --- areas ---

    pub fn insert_area(&self, product_id: i64, name: &str) -> Result<Area, CoverageError> {
        require_name("area", name)?;
        let conn = self.lock()?;
        if products::get_product_impl(&conn, product_id)?.is_none() {
            return Err(CoverageError::not_found("Product", product_id));
        }
        let area = areas::insert_area_impl(&conn, product_id, name)?;
        tracing::info!(product_id, area_id = area.id, "Inserted area");
        Ok(area)
    }

    /// Areas of a product, ordered by name.
    pub fn list_areas(&self, product_id: i64) -> Result<Vec<Area>, CoverageError> {
        let conn = self.lock()?;
        Ok(areas::list_areas_impl(&conn, product_id)?)
    }

    pub fn get_area(&self, id: i64) -> Result<Option<Area>, CoverageError> {
        let conn = self.lock()?;
        Ok(areas::get_area_impl(&conn, id)?)
    }

    pub fn find_area_by_name(
        &self,
        product_id: i64,
        name: &str,
    ) -> Result<Option<i64>, CoverageError> {
        let conn = self.lock()?;
        Ok(areas::find_area_by_name_impl(&conn, product_id, name)?)
    }

    pub fn rename_area(&self, id: i64, name: &str) -> Result<Area, CoverageError> {
        require_name("area", name)?;
        let conn = self.lock()?;
        if areas::rename_area_impl(&conn, id, name)? == 0 {
            return Err(CoverageError::not_found("Area", id));
        }
        areas::get_area_impl(&conn, id)?.ok_or_else(|| CoverageError::not_found("Area", id))
    }

    /// Delete an area: exploratory tests, feature test runs, features, area.
    pub fn delete_area(&self, id: i64) -> Result<(), CoverageError> {
        let conn = self.lock()?;
        let deleted = cascade::in_txn(&conn, |c| cascade::delete_area_impl(c, id))?;
        if deleted == 0 {
            return Err(CoverageError::not_found("Area", id));
        }
        tracing::info!(area_id = id, "Deleted area");
        Ok(())
    }

    // --- features ---

    pub fn insert_feature(&self, feature: &NewFeature) -> Result<Feature, CoverageError> {
        require_name("feature", &feature.name)?;
        let conn = self.lock()?;
        if areas::get_area_impl(&conn, feature.area_id)?.is_none() {
            return Err(CoverageError::not_found("Area", feature.area_id));
        }
        let feature = features::insert_feature_impl(&conn, feature)?;
        tracing::info!(area_id = feature.area_id, feature_id = feature.id, "Inserted feature");
        Ok(feature)
    }

    /// Features of an area, ordered by name.
    pub fn list_features(&self, area_id: i64) -> Result<Vec<Feature>, CoverageError> {
        let conn = self.lock()?;
        Ok(features::list_features_impl(&conn, area_id)?)
    }

    pub fn get_feature(&self, id: i64) -> Result<Option<Feature>, CoverageError> {
        let conn = self.lock()?;
        Ok(features::get_feature_impl(&conn, id)?)
    }

    /// Update name, documentation, url and business value. `area_id` is ignored.
    pub fn update_feature(&self, feature: &Feature) -> Result<Feature, CoverageError> {
        require_name("feature", &feature.name)?;
        let conn = self.lock()?;
        if features::update_feature_impl(&conn, feature)? == 0 {
            return Err(CoverageError::not_found("Feature", feature.id));
        }
        features::get_feature_impl(&conn, feature.id)?
            .ok_or_else(|| CoverageError::not_found("Feature", feature.id))
    }

    /// Delete a feature after its test runs.
    pub fn delete_feature(&self, id: i64) -> Result<(), CoverageError> {
        let conn = self.lock()?;
        let deleted = cascade::in_txn(&conn, |c| cascade::delete_feature_impl(c, id))?;
        if deleted == 0 {
            return Err(CoverageError::not_found("Feature", id));
        }
        tracing::info!(feature_id = id, "Deleted feature");
        Ok(())
    }

    /// Ids of the named (area, feature) pair under a product, if both exist.
    pub fn find_area_and_feature(
        &self,
        product_id: i64,
        area: &str,
        feature: &str,
    ) -> Result<Option<(i64, i64)>, CoverageError> {
        let conn = self.lock()?;
        Ok(features::find_area_and_feature_impl(
            &conn, product_id, area, feature,
        )?)
    }

    pub fn find_feature_by_name(
        &self,
        area_id: i64,
        name: &str,
    ) -> Result<Option<i64>, CoverageError> {
        let conn = self.lock()?;
        Ok(features::find_feature_by_name_impl(&conn, area_id, name)?)
    }

    // --- exploratory tests ---

    pub fn insert_expl_test(&self, test: &NewExplTest) -> Result<ExplTest, CoverageError> {
        if !(1..=5).contains(&test.rating) {
            return Err(CoverageError::validation(format!(
                "rating must be between 1 and 5, got {}",
                test.rating
            )));
        }
        let conn = self.lock()?;
        if areas::get_area_impl(&conn, test.area_id)?.is_none() {
            return Err(CoverageError::not_found("Area", test.area_id));
        }
        let inserted = expl_tests::insert_expl_test_impl(&conn, test)?;
        tracing::info!(area_id = test.area_id, expl_test_id = inserted.id, "Inserted exploratory test");
        Ok(inserted)
    }

    /// Exploratory tests of an area after `cutoff`, newest first.
    pub fn list_expl_tests(
        &self,
        area_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ExplTest>, CoverageError> {
        let conn = self.lock()?;
        Ok(expl_tests::list_expl_tests_impl(&conn, area_id, cutoff)?)
    }

    /// Count and average rating of an area's exploratory tests after `cutoff`.
    pub fn expl_overview(
        &self,
        area_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<ExplOverview, CoverageError> {
        let conn = self.lock()?;
        Ok(expl_tests::expl_overview_impl(&conn, area_id, cutoff)?)
    }

    pub fn delete_expl_test(&self, id: i64) -> Result<(), CoverageError> {
        let conn = self.lock()?;
        if expl_tests::delete_expl_test_impl(&conn, id)? == 0 {
            return Err(CoverageError::not_found("Exploratory test", id));
        }
        tracing::info!(expl_test_id = id, "Deleted exploratory test");
        Ok(())
    }

    // --- test runs ---

    pub fn insert_test_run(&self, run: &NewTestRun) -> Result<i64, CoverageError> {
        let conn = self.lock()?;
        let id = test_runs::insert_test_run_impl(&conn, run)?;
        tracing::debug!(
            test_run_id = id,
            product_id = run.product_id,
            uuid = %run.uuid,
            is_first = run.is_first,
            "Inserted test run"
        );
        Ok(id)
    }

    pub fn uuid_exists(&self, uuid: &str) -> Result<bool, CoverageError> {
        let conn = self.lock()?;
        Ok(test_runs::uuid_exists_impl(&conn, uuid)?)
    }

    /// True when no run with this exact dimension tuple was ever stored.
    pub fn is_first_upload(
        &self,
        product_id: i64,
        area_id: Option<i64>,
        feature_id: Option<i64>,
        group: &RunGroup,
    ) -> Result<bool, CoverageError> {
        let conn = self.lock()?;
        Ok(test_runs::is_first_upload_impl(
            &conn, product_id, area_id, feature_id, group,
        )?)
    }

    /// Runs of `query.scope` newer than `now - window_days`, ordered by
    /// `query.scope.order_by()`.
    pub fn fetch_window(
        &self,
        query: &WindowQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<TestRun>, CoverageError> {
        let conn = self.lock()?;
        let rows = test_runs::fetch_window_impl(&conn, query.scope, query.cutoff(now))?;
        tracing::debug!(scope = ?query.scope, rows = rows.len(), "Fetched window");
        Ok(rows)
    }

    /// All runs newer than `cutoff`, ordered by component, product, suite,
    /// file, newest first.
    pub fn fetch_component_rows(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<TestRun>, CoverageError> {
        let conn = self.lock()?;
        Ok(test_runs::fetch_component_rows_impl(&conn, cutoff)?)
    }

    pub fn suite_file_history(
        &self,
        suite: &str,
        file: &str,
    ) -> Result<Vec<TestRun>, CoverageError> {
        let conn = self.lock()?;
        Ok(test_runs::suite_file_history_impl(&conn, suite, file)?)
    }

    pub fn delete_test_run(&self, id: i64) -> Result<(), CoverageError> {
        let conn = self.lock()?;
        if test_runs::delete_test_run_impl(&conn, id)? == 0 {
            return Err(CoverageError::not_found("Test run", id));
        }
        tracing::info!(test_run_id = id, "Deleted test run");
        Ok(())
    }

    /// Delete every run of a (component, suite, file) group. Returns the count.
    pub fn purge_group(&self, group: &RunGroup) -> Result<usize, CoverageError> {
        let conn = self.lock()?;
        let removed = test_runs::purge_group_impl(&conn, group)?;
        tracing::info!(
            component = %group.component,
            suite = %group.suite,
            file = %group.file,
            removed,
            "Purged test runs"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{is_window_ordered, WindowScope, DEFAULT_WINDOW_DAYS};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn new_run(
        product_id: i64,
        area: Option<i64>,
        feature: Option<i64>,
        group: &RunGroup,
        days_ago: i64,
        total: i64,
    ) -> NewTestRun {
        NewTestRun {
            product_id,
            area_id: area,
            feature_id: feature,
            component: group.component.clone(),
            suite: group.suite.clone(),
            file_name: group.file.clone(),
            url: String::new(),
            total,
            passes: total,
            pending: 0,
            failures: 0,
            skipped: 0,
            uuid: format!(
                "{}-{}-{}-{:?}-{days_ago}",
                group.component, group.suite, group.file, feature
            ),
            is_first: false,
            test_run: now() - Duration::days(days_ago),
        }
    }

    struct Fixture {
        store: CoverageStore,
        product: Product,
        area: Area,
        feature: Feature,
    }

    fn fixture() -> Fixture {
        let store = CoverageStore::memory().unwrap();
        let product = store.insert_product("shop").unwrap();
        let area = store.insert_area(product.id, "checkout").unwrap();
        let feature = store
            .insert_feature(&NewFeature {
                area_id: area.id,
                name: "pay".into(),
                ..NewFeature::default()
            })
            .unwrap();
        Fixture {
            store,
            product,
            area,
            feature,
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let store = CoverageStore::memory().unwrap();
        let conn = store.lock().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_file_backed_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.db");
        {
            let store = CoverageStore::open(&path).unwrap();
            store.insert_product("shop").unwrap();
        }
        let store = CoverageStore::open(&path).unwrap();
        assert_eq!(store.list_products().unwrap().len(), 1);
    }

    #[test]
    fn test_lists_are_ordered_by_name() {
        let f = fixture();
        f.store.insert_area(f.product.id, "billing").unwrap();
        f.store.insert_area(f.product.id, "admin").unwrap();
        let names: Vec<_> = f
            .store
            .list_areas(f.product.id)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["admin", "billing", "checkout"]);
    }

    #[test]
    fn test_missing_parent_and_ids_are_not_found() {
        let f = fixture();
        assert!(matches!(
            f.store.insert_area(999, "x"),
            Err(CoverageError::NotFound { entity: "Product", id: 999 })
        ));
        assert!(matches!(
            f.store.rename_area(999, "x"),
            Err(CoverageError::NotFound { .. })
        ));
        assert!(matches!(
            f.store.delete_feature(999),
            Err(CoverageError::NotFound { .. })
        ));
        assert!(matches!(
            f.store.delete_test_run(999),
            Err(CoverageError::NotFound { .. })
        ));
        assert!(matches!(
            f.store.insert_product("  "),
            Err(CoverageError::Validation { .. })
        ));
    }

    #[test]
    fn test_expl_rating_is_bounded() {
        let f = fixture();
        let mut t = NewExplTest {
            area_id: f.area.id,
            summary: "poked at refunds".into(),
            rating: 6,
            test_run: now(),
            tester: None,
        };
        assert!(matches!(
            f.store.insert_expl_test(&t),
            Err(CoverageError::Validation { .. })
        ));
        t.rating = 4;
        f.store.insert_expl_test(&t).unwrap();
        t.rating = 2;
        f.store.insert_expl_test(&t).unwrap();

        let overview = f
            .store
            .expl_overview(f.area.id, now() - Duration::days(28))
            .unwrap();
        assert_eq!(overview.expl_tests, 2);
        assert!((overview.expl_rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expl_overview_of_empty_area_is_zero() {
        let f = fixture();
        let overview = f
            .store
            .expl_overview(f.area.id, now() - Duration::days(28))
            .unwrap();
        assert_eq!(overview, ExplOverview::default());
    }

    #[test]
    fn test_uuid_is_unique() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        let run = new_run(f.product.id, None, None, &g, 1, 3);
        assert!(!f.store.uuid_exists(&run.uuid).unwrap());
        f.store.insert_test_run(&run).unwrap();
        assert!(f.store.uuid_exists(&run.uuid).unwrap());
        assert!(matches!(
            f.store.insert_test_run(&run),
            Err(CoverageError::Database(_))
        ));
    }

    #[test]
    fn test_is_first_matches_exact_tuple_including_null() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        let (a, fe) = (Some(f.area.id), Some(f.feature.id));

        assert!(f.store.is_first_upload(f.product.id, None, None, &g).unwrap());
        f.store
            .insert_test_run(&new_run(f.product.id, None, None, &g, 2, 3))
            .unwrap();
        assert!(!f.store.is_first_upload(f.product.id, None, None, &g).unwrap());

        // Same group under a feature is a different tuple.
        assert!(f.store.is_first_upload(f.product.id, a, fe, &g).unwrap());
        f.store
            .insert_test_run(&new_run(f.product.id, a, fe, &g, 1, 3))
            .unwrap();
        assert!(!f.store.is_first_upload(f.product.id, a, fe, &g).unwrap());

        let other = RunGroup::new("api", "login", "a.spec");
        assert!(f.store.is_first_upload(f.product.id, a, fe, &other).unwrap());
    }

    #[test]
    fn test_window_filters_and_orders_rows() {
        let f = fixture();
        let second = f
            .store
            .insert_feature(&NewFeature {
                area_id: f.area.id,
                name: "refund".into(),
                ..NewFeature::default()
            })
            .unwrap();
        let (a, f1, f2) = (Some(f.area.id), Some(f.feature.id), Some(second.id));
        let login = RunGroup::new("ui", "login", "a.spec");
        let cart = RunGroup::new("api", "cart", "c.spec");

        for (feature, group, days) in [
            (f2, &login, 3),
            (f1, &login, 20),
            (f1, &cart, 5),
            (f1, &login, 1),
            (f1, &login, 40),
            (f2, &cart, 10),
        ] {
            f.store
                .insert_test_run(&new_run(f.product.id, a, feature, group, days, 1))
                .unwrap();
        }

        let query = WindowQuery::new(WindowScope::Area(f.area.id));
        let rows = f.store.fetch_window(&query, now()).unwrap();
        assert_eq!(rows.len(), 5, "40-day-old run is outside the window");
        assert!(is_window_ordered(query.scope.axis(), &rows));
        assert_eq!(rows[0].feature_id, f1);
        assert_eq!(rows[0].component, "api");
        assert_eq!(rows[1].test_run, now() - Duration::days(1));
        assert_eq!(rows[2].test_run, now() - Duration::days(20));

        let feature_rows = f
            .store
            .fetch_window(&WindowQuery::new(WindowScope::Feature(second.id)), now())
            .unwrap();
        assert_eq!(feature_rows.len(), 2);

        let narrow = query.with_window_days(2);
        assert_eq!(f.store.fetch_window(&narrow, now()).unwrap().len(), 1);
    }

    #[test]
    fn test_window_cutoff_is_exclusive() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        let cutoff = now() - Duration::days(i64::from(DEFAULT_WINDOW_DAYS));

        for (suffix, at) in [("edge", cutoff), ("inside", cutoff + Duration::milliseconds(1))] {
            let mut run = new_run(f.product.id, Some(f.area.id), Some(f.feature.id), &g, 28, 3);
            run.uuid = format!("cutoff-{suffix}");
            run.test_run = at;
            f.store.insert_test_run(&run).unwrap();
        }

        let query = WindowQuery::new(WindowScope::Feature(f.feature.id));
        assert_eq!(query.cutoff(now()), cutoff);
        let rows = f.store.fetch_window(&query, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uuid, "cutoff-inside");
        assert_eq!(rows[0].test_run, cutoff + Duration::milliseconds(1));
    }

    #[test]
    fn test_product_window_keeps_features_of_an_area_apart() {
        let f = fixture();
        let refund = f
            .store
            .insert_feature(&NewFeature {
                area_id: f.area.id,
                name: "refund".into(),
                ..NewFeature::default()
            })
            .unwrap();
        let a = Some(f.area.id);
        let shared = RunGroup::new("ui", "checkout", "shared.spec");
        for (feature, days) in [(f.feature.id, 20), (refund.id, 10), (f.feature.id, 1)] {
            f.store
                .insert_test_run(&new_run(f.product.id, a, Some(feature), &shared, days, 1))
                .unwrap();
        }

        let query = WindowQuery::new(WindowScope::Product(f.product.id));
        let rows = f.store.fetch_window(&query, now()).unwrap();
        assert!(is_window_ordered(query.scope.axis(), &rows));
        let features: Vec<_> = rows.iter().map(|r| r.feature_id).collect();
        assert_eq!(features, vec![Some(f.feature.id), Some(f.feature.id), Some(refund.id)]);
    }

    #[test]
    fn test_area_delete_cascades() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        for days in 1..4 {
            f.store
                .insert_test_run(&new_run(
                    f.product.id,
                    Some(f.area.id),
                    Some(f.feature.id),
                    &g,
                    days,
                    2,
                ))
                .unwrap();
        }
        f.store
            .insert_expl_test(&NewExplTest {
                area_id: f.area.id,
                summary: "s".into(),
                rating: 3,
                test_run: now(),
                tester: Some(7),
            })
            .unwrap();

        f.store.delete_area(f.area.id).unwrap();

        let conn = f.store.lock().unwrap();
        for table in ["tests", "features", "expl_tests", "areas"] {
            let n: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
                .unwrap();
            assert_eq!(n, 0, "{table} not emptied");
        }
    }

    #[test]
    fn test_product_delete_removes_everything() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        f.store
            .insert_test_run(&new_run(f.product.id, None, None, &g, 1, 2))
            .unwrap();
        f.store
            .insert_test_run(&new_run(
                f.product.id,
                Some(f.area.id),
                Some(f.feature.id),
                &g,
                1,
                2,
            ))
            .unwrap();

        f.store.delete_product(f.product.id).unwrap();
        assert!(f.store.list_products().unwrap().is_empty());
        assert!(f.store.suite_file_history("login", "a.spec").unwrap().is_empty());
        assert!(f.store.get_feature(f.feature.id).unwrap().is_none());
    }

    #[test]
    fn test_purge_and_history() {
        let f = fixture();
        let g = RunGroup::new("ui", "login", "a.spec");
        for days in [30, 2, 9] {
            f.store
                .insert_test_run(&new_run(f.product.id, None, None, &g, days, 1))
                .unwrap();
        }
        let history = f.store.suite_file_history("login", "a.spec").unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].test_run > history[1].test_run);
        assert!(history[1].test_run > history[2].test_run);

        assert_eq!(f.store.purge_group(&RunGroup::new("api", "login", "a.spec")).unwrap(), 0);
        assert_eq!(f.store.purge_group(&g).unwrap(), 3);
        assert!(f.store.suite_file_history("login", "a.spec").unwrap().is_empty());
    }
}
