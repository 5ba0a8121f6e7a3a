//! Report ingestion: turns parsed report entries into stored test runs.
//!
//! Per entry: skip a known uuid, resolve (or create) the area and feature,
//! decide `is_first`, insert. Entries are independent; a failure is reported
//! in that entry's status and the rest of the batch continues.
//!
//! The existence checks and inserts are not one transaction. Two concurrent
//! uploads of a new area/feature name can both create it, and two concurrent
//! first uploads of a tuple can both be marked `is_first`.

pub mod mocha;

use crate::errors::CoverageError;
use crate::model::{NewFeature, NewTestRun};
use crate::storage::{CoverageStore, RunGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use mocha::parse_mocha_report;

/// One parsed result (a suite/file execution) of an uploaded report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestResultEntry {
    /// Empty when the report does not name one.
    pub area: String,
    pub feature: String,
    pub suite: String,
    pub file_name: String,
    pub uuid: String,
    pub total: i64,
    pub passes: i64,
    pub pending: i64,
    pub failures: i64,
    pub skipped: i64,
    pub test_run: DateTime<Utc>,
}

/// Upload-wide parameters shared by every entry of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportUpload {
    pub product_id: i64,
    pub component: String,
    pub report_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Inserted(i64),
    AlreadyUploaded(String),
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestOutcome::Inserted(id) => write!(f, "{id}"),
            IngestOutcome::AlreadyUploaded(uuid) => write!(f, "{uuid} already uploaded"),
        }
    }
}

/// Area and feature ids for a named pair, creating whatever is missing.
///
/// Returns `(None, None)` when either name is empty.
pub fn resolve_area_feature(
    store: &CoverageStore,
    product_id: i64,
    area: &str,
    feature: &str,
) -> Result<(Option<i64>, Option<i64>), CoverageError> {
    if area.is_empty() || feature.is_empty() {
        return Ok((None, None));
    }
    if let Some((aid, fid)) = store.find_area_and_feature(product_id, area, feature)? {
        return Ok((Some(aid), Some(fid)));
    }

    let area_id = match store.find_area_by_name(product_id, area)? {
        Some(id) => id,
        None => store.insert_area(product_id, area)?.id,
    };
    let feature_id = match store.find_feature_by_name(area_id, feature)? {
        Some(id) => id,
        None => {
            store
                .insert_feature(&NewFeature {
                    area_id,
                    name: feature.to_string(),
                    ..NewFeature::default()
                })?
                .id
        }
    };
    tracing::info!(product_id, area_id, feature_id, "Resolved area/feature for upload");
    Ok((Some(area_id), Some(feature_id)))
}

/// Store one entry unless its uuid is already known.
pub fn ingest_entry(
    store: &CoverageStore,
    upload: &ReportUpload,
    entry: &TestResultEntry,
) -> Result<IngestOutcome, CoverageError> {
    if store.uuid_exists(&entry.uuid)? {
        return Ok(IngestOutcome::AlreadyUploaded(entry.uuid.clone()));
    }

    let (area_id, feature_id) =
        resolve_area_feature(store, upload.product_id, &entry.area, &entry.feature)?;
    let group = RunGroup::new(&upload.component, &entry.suite, &entry.file_name);
    let is_first = store.is_first_upload(upload.product_id, area_id, feature_id, &group)?;

    let id = store.insert_test_run(&NewTestRun {
        product_id: upload.product_id,
        area_id,
        feature_id,
        component: group.component,
        suite: group.suite,
        file_name: group.file,
        url: upload.report_url.clone(),
        total: entry.total,
        passes: entry.passes,
        pending: entry.pending,
        failures: entry.failures,
        skipped: entry.skipped,
        uuid: entry.uuid.clone(),
        is_first,
        test_run: entry.test_run,
    })?;
    Ok(IngestOutcome::Inserted(id))
}

/// Status line for one entry: its new id, "<uuid> already uploaded", or the
/// error text.
pub fn entry_status(result: Result<IngestOutcome, CoverageError>, uuid: &str) -> String {
    match result {
        Ok(outcome) => outcome.to_string(),
        Err(e) => {
            tracing::warn!(uuid = %uuid, error = %e, "Failed to ingest entry");
            e.to_string()
        }
    }
}
