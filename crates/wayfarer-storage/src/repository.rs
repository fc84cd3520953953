//! History repository backed by the `travel_queries` table.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::OptionalExtension;
use tracing::{debug, info};

use wayfarer_core::error::WayfarerError;
use wayfarer_core::types::{AdvisoryRecord, HistoryEntry, Query};

use crate::db::Database;

const SELECT_COLUMNS: &str = "SELECT id, query, destination, origin, response, created_at
     FROM travel_queries";

/// Repository for past queries and the advisories they produced.
///
/// Entries are only created through [`append`](Self::append); nothing
/// outside this type mutates the history.
pub struct HistoryRepository {
    db: Arc<Database>,
}

impl HistoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a query and its advisory record, returning the new entry.
    pub fn append(
        &self,
        query: &Query,
        record: &AdvisoryRecord,
    ) -> Result<HistoryEntry, WayfarerError> {
        let response = serde_json::to_string(record)?;
        let created_at = now_millis();

        let id = self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO travel_queries (query, destination, origin, response, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    query.as_str(),
                    record.destination,
                    record.origin,
                    response,
                    created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| WayfarerError::Storage(format!("Failed to save query: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })?;

        info!(entry_id = id, destination = %record.destination, "History entry saved");

        Ok(HistoryEntry {
            id,
            query: query.as_str().to_string(),
            destination: record.destination.clone(),
            origin: record.origin.clone(),
            response: record.clone(),
            created_at,
        })
    }

    /// List entries newest first, optionally limited.
    pub fn list(&self, limit: Option<u64>) -> Result<Vec<HistoryEntry>, WayfarerError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

        let entries = self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))
                .map_err(|e| WayfarerError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit], |row| Ok(row_to_entry(row)))
                .map_err(|e| WayfarerError::Storage(e.to_string()))?;

            let mut entries = Vec::new();
            for row in rows {
                let entry = row.map_err(|e| WayfarerError::Storage(e.to_string()))??;
                entries.push(entry);
            }
            Ok(entries)
        })?;

        debug!(count = entries.len(), "History listed");
        Ok(entries)
    }

    /// Find an entry by ID.
    pub fn get_by_id(&self, id: i64) -> Result<Option<HistoryEntry>, WayfarerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
                .map_err(|e| WayfarerError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id], |row| Ok(row_to_entry(row)))
                .optional()
                .map_err(|e| WayfarerError::Storage(e.to_string()))?;

            result.transpose()
        })
    }

    /// Delete an entry by ID. Returns `false` if no such entry existed.
    pub fn delete_by_id(&self, id: i64) -> Result<bool, WayfarerError> {
        let deleted = self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM travel_queries WHERE id = ?1",
                rusqlite::params![id],
            )
            .map_err(|e| WayfarerError::Storage(format!("Failed to delete query: {}", e)))
        })?;

        if deleted > 0 {
            info!(entry_id = id, "History entry deleted");
        }
        Ok(deleted > 0)
    }

    /// Delete every entry, returning how many were removed.
    pub fn clear(&self) -> Result<u64, WayfarerError> {
        let deleted = self.db.with_conn(|conn| {
            conn.execute("DELETE FROM travel_queries", [])
                .map_err(|e| WayfarerError::Storage(format!("Failed to clear history: {}", e)))
        })?;
        info!(deleted, "History cleared");
        Ok(deleted as u64)
    }

    /// Count stored entries.
    pub fn count(&self) -> Result<u64, WayfarerError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM travel_queries", [], |row| row.get(0))
                .map_err(|e| WayfarerError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Current time truncated to the millisecond precision stored on disk.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<HistoryEntry, WayfarerError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;
    let query: String = row
        .get(1)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;
    let destination: String = row
        .get(2)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;
    let origin: Option<String> = row
        .get(3)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;
    let response_json: String = row
        .get(4)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;
    let created_ms: i64 = row
        .get(5)
        .map_err(|e| WayfarerError::Storage(e.to_string()))?;

    let response: AdvisoryRecord = serde_json::from_str(&response_json).map_err(|e| {
        WayfarerError::Storage(format!("Corrupt response for entry {}: {}", id, e))
    })?;
    let created_at = Utc
        .timestamp_millis_opt(created_ms)
        .single()
        .ok_or_else(|| {
            WayfarerError::Storage(format!("Invalid created_at for entry {}: {}", id, created_ms))
        })?;

    Ok(HistoryEntry {
        id,
        query,
        destination,
        origin,
        response,
        created_at,
    })
}
