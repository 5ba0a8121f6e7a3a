use crate::model::Product;
use rusqlite::{params, Connection, OptionalExtension};

pub(crate) fn insert_product_impl(conn: &Connection, name: &str) -> rusqlite::Result<Product> {
    conn.execute("INSERT INTO products(name) VALUES (?1)", params![name])?;
    Ok(Product {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub(crate) fn list_products_impl(conn: &Connection) -> rusqlite::Result<Vec<Product>> {
    let mut stmt = conn.prepare("SELECT id, name FROM products ORDER BY name, id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect()
}

pub(crate) fn get_product_impl(conn: &Connection, id: i64) -> rusqlite::Result<Option<Product>> {
    conn.query_row(
        "SELECT id, name FROM products WHERE id = ?1",
        params![id],
        |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
}

/// Returns the number of rows changed (0 when the product does not exist).
pub(crate) fn rename_product_impl(conn: &Connection, id: i64, name: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE products SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![name, id],
    )
}
