//! Catalog table bootstrap.
//!
//! The schema is created idempotently; there is no versioning or migration.

use super::DbResult;
use log::info;
use rusqlite::Connection;

const VEHICLES_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT NOT NULL CHECK (length(make) BETWEEN 1 AND 50),
    model TEXT NOT NULL CHECK (length(model) BETWEEN 1 AND 50),
    manufacture_year INTEGER NOT NULL,
    color TEXT NOT NULL CHECK (length(color) BETWEEN 1 AND 30),
    price REAL NOT NULL CHECK (price >= 0)
);";

/// Creates the `vehicles` table when it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(VEHICLES_SCHEMA_SQL)?;
    info!("event=schema_ready module=db status=ok table=vehicles");
    Ok(())
}

/// Returns whether the `vehicles` table exists on this connection.
pub fn vehicles_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'vehicles'
        );",
        [],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
