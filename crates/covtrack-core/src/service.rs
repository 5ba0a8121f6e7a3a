//! Async facade over the store, reducer and assembler.
//!
//! Every store call runs on the blocking pool under the configured deadline.
//! The reducer and the assembler only run once the read has returned, on
//! rows owned by the calling task. An expired deadline does not stop the
//! blocking call itself; its result is dropped.

use crate::assembler::{assemble_area_coverage, assemble_feature_coverage};
use crate::config::CoverageConfig;
use crate::errors::CoverageError;
use crate::ingest::{entry_status, ingest_entry, ReportUpload, TestResultEntry};
use crate::model::{
    Area, AreaCoverage, ComponentRun, ExplTest, Feature, FeatureCoverage, NewExplTest,
    NewFeature, Product, TestCoverage, TestRun,
};
use crate::reducer::{reduce_components, reduce_coverage, reduce_test_listing};
use crate::storage::{CoverageStore, RunGroup};
use crate::window::{window_cutoff, WindowQuery, WindowScope};
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoverageService {
    store: CoverageStore,
    window_days: u32,
    store_timeout: Duration,
}

impl CoverageService {
    pub fn new(store: CoverageStore, config: &CoverageConfig) -> Self {
        Self {
            store,
            window_days: config.window_days,
            store_timeout: config.store_timeout(),
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn store(&self) -> &CoverageStore {
        &self.store
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    fn query(&self, scope: WindowScope) -> WindowQuery {
        WindowQuery::new(scope).with_window_days(self.window_days)
    }

    /// Run `f` against the store on the blocking pool, bounded by the deadline.
    async fn with_store<T, F>(&self, operation: &'static str, f: F) -> Result<T, CoverageError>
    where
        F: FnOnce(&CoverageStore) -> Result<T, CoverageError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || f(&store));

        match tokio::time::timeout(self.store_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                tracing::error!(operation, error = %join_err, "Store task failed");
                Err(CoverageError::Database(format!(
                    "store task '{operation}' failed: {join_err}"
                )))
            }
            Err(_) => {
                let after_ms = u64::try_from(self.store_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, after_ms, "Store call timed out");
                Err(CoverageError::Timeout {
                    operation: operation.to_string(),
                    after_ms,
                })
            }
        }
    }

    // --- coverage ---

    /// Coverage of every area of a product, with exploratory test stats.
    pub async fn product_coverage(&self, product_id: i64) -> Result<Vec<AreaCoverage>, CoverageError> {
        let query = self.query(WindowScope::Product(product_id));
        let now = Utc::now();
        let cutoff = query.cutoff(now);

        let (areas, rows, expl) = self
            .with_store("product_coverage", move |store| {
                if store.get_product(product_id)?.is_none() {
                    return Err(CoverageError::not_found("Product", product_id));
                }
                let areas = store.list_areas(product_id)?;
                let rows = store.fetch_window(&query, now)?;
                let mut expl = HashMap::with_capacity(areas.len());
                for area in &areas {
                    expl.insert(area.id, store.expl_overview(area.id, cutoff)?);
                }
                Ok((areas, rows, expl))
            })
            .await?;

        let coverage = reduce_coverage(query.scope.axis(), &rows);
        Ok(assemble_area_coverage(areas, &coverage, &expl))
    }

    /// Coverage of every feature of an area.
    pub async fn area_coverage(&self, area_id: i64) -> Result<Vec<FeatureCoverage>, CoverageError> {
        let query = self.query(WindowScope::Area(area_id));
        let now = Utc::now();

        let (features, rows) = self
            .with_store("area_coverage", move |store| {
                if store.get_area(area_id)?.is_none() {
                    return Err(CoverageError::not_found("Area", area_id));
                }
                Ok((store.list_features(area_id)?, store.fetch_window(&query, now)?))
            })
            .await?;

        let coverage = reduce_coverage(query.scope.axis(), &rows);
        Ok(assemble_feature_coverage(features, &coverage))
    }

    /// Latest run per (component, suite, file) of a feature.
    pub async fn feature_tests(&self, feature_id: i64) -> Result<Vec<TestCoverage>, CoverageError> {
        self.get_feature(feature_id).await?;
        self.test_listing(WindowScope::Feature(feature_id)).await
    }

    /// Latest run per (area, component, suite, file) of a product.
    pub async fn product_tests(&self, product_id: i64) -> Result<Vec<TestCoverage>, CoverageError> {
        if self
            .with_store("get_product", move |s| s.get_product(product_id))
            .await?
            .is_none()
        {
            return Err(CoverageError::not_found("Product", product_id));
        }
        self.test_listing(WindowScope::Product(product_id)).await
    }

    async fn test_listing(&self, scope: WindowScope) -> Result<Vec<TestCoverage>, CoverageError> {
        let query = self.query(scope);
        let now = Utc::now();
        let rows = self
            .with_store("fetch_window", move |s| s.fetch_window(&query, now))
            .await?;
        Ok(reduce_test_listing(scope.axis(), &rows))
    }

    pub async fn suite_file_history(
        &self,
        suite: String,
        file: String,
    ) -> Result<Vec<TestRun>, CoverageError> {
        self.with_store("suite_file_history", move |s| {
            s.suite_file_history(&suite, &file)
        })
        .await
    }

    /// Every component seen in the window with its latest-run sums.
    pub async fn components(&self) -> Result<Vec<ComponentRun>, CoverageError> {
        let cutoff = window_cutoff(Utc::now(), self.window_days);
        let rows = self
            .with_store("fetch_component_rows", move |s| s.fetch_component_rows(cutoff))
            .await?;
        Ok(reduce_components(&rows))
    }

    // --- ingestion ---

    /// Ingest parsed report entries. Returns one status string per entry.
    ///
    /// Only an unknown product fails the whole call; entry failures
    /// (including timeouts) land in that entry's status.
    pub async fn ingest_report(
        &self,
        upload: ReportUpload,
        entries: Vec<TestResultEntry>,
    ) -> Result<Vec<String>, CoverageError> {
        let product_id = upload.product_id;
        if self
            .with_store("get_product", move |s| s.get_product(product_id))
            .await?
            .is_none()
        {
            return Err(CoverageError::not_found("Product", product_id));
        }

        let mut status = Vec::with_capacity(entries.len());
        for entry in entries {
            let uuid = entry.uuid.clone();
            let upload = upload.clone();
            let result = self
                .with_store("ingest_entry", move |s| ingest_entry(s, &upload, &entry))
                .await;
            status.push(entry_status(result, &uuid));
        }
        tracing::info!(product_id, entries = status.len(), "Ingested report");
        Ok(status)
    }

    // --- structural CRUD ---

    pub async fn create_product(&self, name: String) -> Result<Product, CoverageError> {
        self.with_store("insert_product", move |s| s.insert_product(&name))
            .await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoverageError> {
        self.with_store("list_products", |s| s.list_products()).await
    }

    pub async fn rename_product(&self, id: i64, name: String) -> Result<Product, CoverageError> {
        self.with_store("rename_product", move |s| s.rename_product(id, &name))
            .await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), CoverageError> {
        self.with_store("delete_product", move |s| s.delete_product(id))
            .await
    }

    pub async fn create_area(&self, product_id: i64, name: String) -> Result<Area, CoverageError> {
        self.with_store("insert_area", move |s| s.insert_area(product_id, &name))
            .await
    }

    pub async fn list_areas(&self, product_id: i64) -> Result<Vec<Area>, CoverageError> {
        self.with_store("list_areas", move |s| s.list_areas(product_id))
            .await
    }

    pub async fn rename_area(&self, id: i64, name: String) -> Result<Area, CoverageError> {
        self.with_store("rename_area", move |s| s.rename_area(id, &name))
            .await
    }

    pub async fn delete_area(&self, id: i64) -> Result<(), CoverageError> {
        self.with_store("delete_area", move |s| s.delete_area(id))
            .await
    }

    pub async fn create_feature(&self, feature: NewFeature) -> Result<Feature, CoverageError> {
        self.with_store("insert_feature", move |s| s.insert_feature(&feature))
            .await
    }

    pub async fn list_features(&self, area_id: i64) -> Result<Vec<Feature>, CoverageError> {
        self.with_store("list_features", move |s| s.list_features(area_id))
            .await
    }

    pub async fn get_feature(&self, id: i64) -> Result<Feature, CoverageError> {
        self.with_store("get_feature", move |s| s.get_feature(id))
            .await?
            .ok_or_else(|| CoverageError::not_found("Feature", id))
    }

    pub async fn update_feature(&self, feature: Feature) -> Result<Feature, CoverageError> {
        self.with_store("update_feature", move |s| s.update_feature(&feature))
            .await
    }

    pub async fn delete_feature(&self, id: i64) -> Result<(), CoverageError> {
        self.with_store("delete_feature", move |s| s.delete_feature(id))
            .await
    }

    pub async fn create_expl_test(&self, test: NewExplTest) -> Result<ExplTest, CoverageError> {
        self.with_store("insert_expl_test", move |s| s.insert_expl_test(&test))
            .await
    }

    /// Exploratory tests of an area inside the window, newest first.
    pub async fn list_expl_tests(&self, area_id: i64) -> Result<Vec<ExplTest>, CoverageError> {
        let cutoff = window_cutoff(Utc::now(), self.window_days);
        self.with_store("list_expl_tests", move |s| {
            s.list_expl_tests(area_id, cutoff)
        })
        .await
    }

    pub async fn delete_expl_test(&self, id: i64) -> Result<(), CoverageError> {
        self.with_store("delete_expl_test", move |s| s.delete_expl_test(id))
            .await
    }

    // --- test run maintenance ---

    pub async fn delete_test_run(&self, id: i64) -> Result<(), CoverageError> {
        self.with_store("delete_test_run", move |s| s.delete_test_run(id))
            .await
    }

    pub async fn purge_group(&self, group: RunGroup) -> Result<usize, CoverageError> {
        self.with_store("purge_group", move |s| s.purge_group(&group))
            .await
    }
}
