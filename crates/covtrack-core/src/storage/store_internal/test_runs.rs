use super::time::{format_ts, ts_column};
use crate::model::{NewTestRun, TestRun};
use crate::storage::store::RunGroup;
use crate::window::WindowScope;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

const RUN_COLUMNS: &str = "id, product_id, area_id, feature_id, component, suite, file, url, \
     total, passes, pending, failures, skipped, uuid, is_first, testrun";

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<TestRun> {
    Ok(TestRun {
        id: row.get(0)?,
        product_id: row.get(1)?,
        area_id: row.get(2)?,
        feature_id: row.get(3)?,
        component: row.get(4)?,
        suite: row.get(5)?,
        file_name: row.get(6)?,
        url: row.get(7)?,
        total: row.get(8)?,
        passes: row.get(9)?,
        pending: row.get(10)?,
        failures: row.get(11)?,
        skipped: row.get(12)?,
        uuid: row.get(13)?,
        is_first: row.get::<_, i64>(14)? != 0,
        test_run: ts_column(row, 15)?,
    })
}

pub(crate) fn insert_test_run_impl(conn: &Connection, run: &NewTestRun) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO tests (
            product_id, area_id, feature_id, component, suite, file, url,
            total, passes, pending, failures, skipped, uuid, is_first, testrun
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
        params![
            run.product_id,
            run.area_id,
            run.feature_id,
            run.component,
            run.suite,
            run.file_name,
            run.url,
            run.total,
            run.passes,
            run.pending,
            run.failures,
            run.skipped,
            run.uuid,
            run.is_first as i32,
            format_ts(&run.test_run),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn uuid_exists_impl(conn: &Connection, uuid: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tests WHERE uuid = ?1",
        params![uuid],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// True when no stored run has this exact dimension tuple. `IS` makes a
/// missing area or feature match NULL.
pub(crate) fn is_first_upload_impl(
    conn: &Connection,
    product_id: i64,
    area_id: Option<i64>,
    feature_id: Option<i64>,
    group: &RunGroup,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        r#"
        SELECT COUNT(*) FROM tests
        WHERE product_id = ?1 AND area_id IS ?2 AND feature_id IS ?3
          AND component = ?4 AND suite = ?5 AND file = ?6
        "#,
        params![
            product_id,
            area_id,
            feature_id,
            group.component,
            group.suite,
            group.file
        ],
        |row| row.get(0),
    )?;
    Ok(count == 0)
}

/// Window rows of one scope, in the order the reducer consumes them.
pub(crate) fn fetch_window_impl(
    conn: &Connection,
    scope: WindowScope,
    cutoff: DateTime<Utc>,
) -> rusqlite::Result<Vec<TestRun>> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM tests WHERE {} = ?1 AND testrun > ?2 ORDER BY {}",
        scope.filter_column(),
        scope.order_by()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![scope.id(), format_ts(&cutoff)], row_to_run)?;
    rows.collect()
}

/// Window rows of every product, ordered for the component rollup.
pub(crate) fn fetch_component_rows_impl(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> rusqlite::Result<Vec<TestRun>> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM tests WHERE testrun > ?1 \
         ORDER BY component ASC, product_id ASC, suite ASC, file ASC, testrun DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![format_ts(&cutoff)], row_to_run)?;
    rows.collect()
}

/// Every run of a (suite, file) pair, newest first. Not windowed.
pub(crate) fn suite_file_history_impl(
    conn: &Connection,
    suite: &str,
    file: &str,
) -> rusqlite::Result<Vec<TestRun>> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM tests WHERE suite = ?1 AND file = ?2 \
         ORDER BY testrun DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![suite, file], row_to_run)?;
    rows.collect()
}

pub(crate) fn delete_test_run_impl(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM tests WHERE id = ?1", params![id])
}

pub(crate) fn purge_group_impl(conn: &Connection, group: &RunGroup) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM tests WHERE component = ?1 AND suite = ?2 AND file = ?3",
        params![group.component, group.suite, group.file],
    )
}

pub(crate) fn delete_runs_for_feature_impl(conn: &Connection, feature_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM tests WHERE feature_id = ?1", params![feature_id])
}

pub(crate) fn delete_runs_for_area_impl(conn: &Connection, area_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM tests WHERE area_id = ?1", params![area_id])
}

pub(crate) fn delete_runs_for_product_impl(conn: &Connection, product_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM tests WHERE product_id = ?1", params![product_id])
}
