//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use wayfarer_core::error::WayfarerError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), WayfarerError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| WayfarerError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| WayfarerError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: travel_queries");
    }

    Ok(())
}

/// Version 1: query history table.
///
/// `response` holds the serialized advisory record; `created_at` is epoch
/// milliseconds.
fn apply_v1(conn: &Connection) -> Result<(), WayfarerError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS travel_queries (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            query           TEXT NOT NULL,
            destination     TEXT NOT NULL CHECK (length(destination) > 0),
            origin          TEXT,
            response        TEXT NOT NULL,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_travel_queries_created_at
            ON travel_queries (created_at DESC, id DESC);

        CREATE INDEX IF NOT EXISTS idx_travel_queries_destination
            ON travel_queries (destination);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'travel_queries');
        ",
    )
    .map_err(|e| WayfarerError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
