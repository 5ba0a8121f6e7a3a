//! SQLite schema for coverage tracking.
//!
//! Tables:
//! - `products`, `areas`, `features`: structural entities
//! - `tests`: append-only test run log (one row per suite/file execution)
//! - `expl_tests`: exploratory test sessions per area
//!
//! No `ON DELETE CASCADE`: deletes walk the dependency order explicitly.

/// DDL for the coverage tables.
///
/// Schema version: 3 (component + is_first on `tests`)
pub const COVERAGE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS areas (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id  INTEGER NOT NULL REFERENCES products(id),
    name        TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS features (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    area_id         INTEGER NOT NULL REFERENCES areas(id),
    name            TEXT NOT NULL,
    documentation   TEXT NOT NULL DEFAULT '',
    url             TEXT NOT NULL DEFAULT '',
    business_value  TEXT NOT NULL DEFAULT '',
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Test runs (immutable after insert)
CREATE TABLE IF NOT EXISTS tests (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id  INTEGER NOT NULL REFERENCES products(id),
    area_id     INTEGER REFERENCES areas(id),
    feature_id  INTEGER REFERENCES features(id),
    component   TEXT NOT NULL DEFAULT '',
    suite       TEXT NOT NULL,
    file        TEXT NOT NULL,
    url         TEXT NOT NULL DEFAULT '',
    total       INTEGER NOT NULL DEFAULT 0,
    passes      INTEGER NOT NULL DEFAULT 0,
    pending     INTEGER NOT NULL DEFAULT 0,
    failures    INTEGER NOT NULL DEFAULT 0,
    skipped     INTEGER NOT NULL DEFAULT 0,
    uuid        TEXT NOT NULL UNIQUE,
    is_first    INTEGER NOT NULL DEFAULT 0,
    testrun     TEXT NOT NULL,
    inserted_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS expl_tests (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    area_id     INTEGER NOT NULL REFERENCES areas(id),
    summary     TEXT NOT NULL,
    rating      INTEGER NOT NULL,
    testrun     TEXT NOT NULL,
    tester      INTEGER,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Window reads
CREATE INDEX IF NOT EXISTS idx_tests_product_window
    ON tests(product_id, testrun);
CREATE INDEX IF NOT EXISTS idx_tests_area_window
    ON tests(area_id, testrun);
CREATE INDEX IF NOT EXISTS idx_tests_feature_window
    ON tests(feature_id, testrun);
CREATE INDEX IF NOT EXISTS idx_tests_group
    ON tests(component, suite, file);
CREATE INDEX IF NOT EXISTS idx_expl_tests_area
    ON expl_tests(area_id, testrun);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(COVERAGE_SCHEMA).unwrap();
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(COVERAGE_SCHEMA).unwrap();
        conn.execute_batch(COVERAGE_SCHEMA).unwrap();
    }
}
