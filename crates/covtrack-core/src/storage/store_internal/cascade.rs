//! Dependency-ordered deletes. The schema has no `ON DELETE CASCADE`, so
//! children go first and every cascade runs in one transaction.

use super::{areas, expl_tests, features, test_runs};
use rusqlite::{params, Connection};

/// Run `f` inside `BEGIN IMMEDIATE`, committing on success.
pub(crate) fn in_txn<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    conn.execute("BEGIN IMMEDIATE", [])?;
    let result = f(conn);

    match &result {
        Ok(_) => {
            conn.execute("COMMIT", [])?;
        }
        Err(_) => {
            let _ = conn.execute("ROLLBACK", []);
        }
    }

    result
}

/// Feature: its test runs, then the feature row.
pub(crate) fn delete_feature_impl(conn: &Connection, feature_id: i64) -> rusqlite::Result<usize> {
    let runs = test_runs::delete_runs_for_feature_impl(conn, feature_id)?;
    let deleted = conn.execute("DELETE FROM features WHERE id = ?1", params![feature_id])?;
    tracing::debug!(feature_id, runs, "Deleted feature test runs");
    Ok(deleted)
}

/// Area: exploratory tests, test runs of every feature, features, area.
pub(crate) fn delete_area_impl(conn: &Connection, area_id: i64) -> rusqlite::Result<usize> {
    let expl = expl_tests::delete_expl_tests_for_area_impl(conn, area_id)?;
    let feature_ids = features::feature_ids_for_area_impl(conn, area_id)?;
    let mut runs = 0;
    for fid in &feature_ids {
        runs += test_runs::delete_runs_for_feature_impl(conn, *fid)?;
    }
    runs += test_runs::delete_runs_for_area_impl(conn, area_id)?;
    conn.execute("DELETE FROM features WHERE area_id = ?1", params![area_id])?;
    let deleted = conn.execute("DELETE FROM areas WHERE id = ?1", params![area_id])?;
    tracing::debug!(
        area_id,
        expl,
        runs,
        features = feature_ids.len(),
        "Deleted area dependents"
    );
    Ok(deleted)
}

/// Product: every area (as above), remaining product-level runs, product.
pub(crate) fn delete_product_impl(conn: &Connection, product_id: i64) -> rusqlite::Result<usize> {
    for area_id in areas::area_ids_for_product_impl(conn, product_id)? {
        delete_area_impl(conn, area_id)?;
    }
    test_runs::delete_runs_for_product_impl(conn, product_id)?;
    conn.execute("DELETE FROM products WHERE id = ?1", params![product_id])
}
