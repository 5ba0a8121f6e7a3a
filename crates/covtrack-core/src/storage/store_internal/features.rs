use crate::model::{Feature, NewFeature};
use rusqlite::{params, Connection, OptionalExtension};

fn row_to_feature(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: row.get(0)?,
        area_id: row.get(1)?,
        name: row.get(2)?,
        documentation: row.get(3)?,
        url: row.get(4)?,
        business_value: row.get(5)?,
    })
}

pub(crate) fn insert_feature_impl(conn: &Connection, f: &NewFeature) -> rusqlite::Result<Feature> {
    conn.execute(
        "INSERT INTO features(area_id, name, documentation, url, business_value)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![f.area_id, f.name, f.documentation, f.url, f.business_value],
    )?;
    Ok(Feature {
        id: conn.last_insert_rowid(),
        area_id: f.area_id,
        name: f.name.clone(),
        documentation: f.documentation.clone(),
        url: f.url.clone(),
        business_value: f.business_value.clone(),
    })
}

/// Features of an area, alphabetical.
pub(crate) fn list_features_impl(conn: &Connection, area_id: i64) -> rusqlite::Result<Vec<Feature>> {
    let mut stmt = conn.prepare(
        "SELECT id, area_id, name, documentation, url, business_value
         FROM features WHERE area_id = ?1 ORDER BY name, id",
    )?;
    let rows = stmt.query_map(params![area_id], row_to_feature)?;
    rows.collect()
}

pub(crate) fn get_feature_impl(conn: &Connection, id: i64) -> rusqlite::Result<Option<Feature>> {
    conn.query_row(
        "SELECT id, area_id, name, documentation, url, business_value FROM features WHERE id = ?1",
        params![id],
        row_to_feature,
    )
    .optional()
}

pub(crate) fn update_feature_impl(conn: &Connection, f: &Feature) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE features
         SET name = ?1, documentation = ?2, url = ?3, business_value = ?4,
             updated_at = datetime('now')
         WHERE id = ?5",
        params![f.name, f.documentation, f.url, f.business_value, f.id],
    )
}

pub(crate) fn feature_ids_for_area_impl(conn: &Connection, area_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM features WHERE area_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![area_id], |row| row.get(0))?;
    rows.collect()
}

/// Ids of the (area, feature) pair with these names under a product.
pub(crate) fn find_area_and_feature_impl(
    conn: &Connection,
    product_id: i64,
    area: &str,
    feature: &str,
) -> rusqlite::Result<Option<(i64, i64)>> {
    conn.query_row(
        "SELECT a.id, f.id
         FROM areas a JOIN features f ON a.id = f.area_id
         WHERE a.product_id = ?1 AND a.name = ?2 AND f.name = ?3
         ORDER BY a.id, f.id LIMIT 1",
        params![product_id, area, feature],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub(crate) fn find_feature_by_name_impl(
    conn: &Connection,
    area_id: i64,
    name: &str,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM features WHERE area_id = ?1 AND name = ?2 ORDER BY id LIMIT 1",
        params![area_id, name],
        |row| row.get(0),
    )
    .optional()
}
