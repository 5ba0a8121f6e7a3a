use crate::model::Area;
use rusqlite::{params, Connection, OptionalExtension};

fn row_to_area(row: &rusqlite::Row<'_>) -> rusqlite::Result<Area> {
    Ok(Area {
        id: row.get(0)?,
        product_id: row.get(1)?,
        name: row.get(2)?,
    })
}

pub(crate) fn insert_area_impl(conn: &Connection, product_id: i64, name: &str) -> rusqlite::Result<Area> {
    conn.execute(
        "INSERT INTO areas(product_id, name) VALUES (?1, ?2)",
        params![product_id, name],
    )?;
    Ok(Area {
        id: conn.last_insert_rowid(),
        product_id,
        name: name.to_string(),
    })
}

/// Areas of a product, alphabetical.
pub(crate) fn list_areas_impl(conn: &Connection, product_id: i64) -> rusqlite::Result<Vec<Area>> {
    let mut stmt = conn.prepare(
        "SELECT id, product_id, name FROM areas WHERE product_id = ?1 ORDER BY name, id",
    )?;
    let rows = stmt.query_map(params![product_id], row_to_area)?;
    rows.collect()
}

pub(crate) fn get_area_impl(conn: &Connection, id: i64) -> rusqlite::Result<Option<Area>> {
    conn.query_row(
        "SELECT id, product_id, name FROM areas WHERE id = ?1",
        params![id],
        row_to_area,
    )
    .optional()
}

pub(crate) fn find_area_by_name_impl(
    conn: &Connection,
    product_id: i64,
    name: &str,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM areas WHERE product_id = ?1 AND name = ?2 ORDER BY id LIMIT 1",
        params![product_id, name],
        |row| row.get(0),
    )
    .optional()
}

pub(crate) fn area_ids_for_product_impl(conn: &Connection, product_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM areas WHERE product_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![product_id], |row| row.get(0))?;
    rows.collect()
}

pub(crate) fn rename_area_impl(conn: &Connection, id: i64, name: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE areas SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![name, id],
    )
}
