//! One-shot CLI commands.
//!
//! Each command writes its result to the given writer; JSON for records,
//! one line per entry for listings.

use std::io::Write;

use wayfarer_advisory::AdvisoryEngine;
use wayfarer_core::config::WayfarerConfig;
use wayfarer_core::error::WayfarerError;
use wayfarer_core::types::{HistoryEntry, Query, RouteHints};
use wayfarer_storage::HistoryRepository;

/// Answer a question. When `history` is given the entry is stored and
/// printed, otherwise only the advisory record is printed.
pub fn ask<W: Write>(
    engine: &AdvisoryEngine,
    history: Option<&HistoryRepository>,
    words: &[String],
    hints: &RouteHints,
    out: &mut W,
) -> Result<(), WayfarerError> {
    let query = Query::parse(&words.join(" "))?;
    let record = engine.advise(&query, hints)?;

    let json = match history {
        Some(repo) => serde_json::to_string_pretty(&repo.append(&query, &record)?)?,
        None => serde_json::to_string_pretty(&record)?,
    };
    writeln!(out, "{}", json)?;
    Ok(())
}

pub fn history<W: Write>(
    repo: &HistoryRepository,
    limit: u64,
    out: &mut W,
) -> Result<(), WayfarerError> {
    let entries = repo.list(Some(limit))?;
    if entries.is_empty() {
        writeln!(out, "No queries recorded.")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(out, "{}", summary_line(entry))?;
    }
    Ok(())
}

pub fn show<W: Write>(repo: &HistoryRepository, id: i64, out: &mut W) -> Result<(), WayfarerError> {
    let entry = repo
        .get_by_id(id)?
        .ok_or_else(|| WayfarerError::NotFound(format!("Query {} not found", id)))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
    Ok(())
}

pub fn delete<W: Write>(
    repo: &HistoryRepository,
    id: i64,
    out: &mut W,
) -> Result<(), WayfarerError> {
    if !repo.delete_by_id(id)? {
        return Err(WayfarerError::NotFound(format!("Query {} not found", id)));
    }
    writeln!(out, "Query deleted successfully")?;
    Ok(())
}

pub fn clear<W: Write>(repo: &HistoryRepository, out: &mut W) -> Result<(), WayfarerError> {
    let deleted = repo.clear()?;
    writeln!(out, "Deleted {} queries", deleted)?;
    Ok(())
}

pub fn print_config<W: Write>(config: &WayfarerConfig, out: &mut W) -> Result<(), WayfarerError> {
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    Ok(())
}

fn summary_line(entry: &HistoryEntry) -> String {
    let route = match &entry.origin {
        Some(origin) => format!("{} -> {}", origin, entry.destination),
        None => entry.destination.clone(),
    };
    format!(
        "{:>5}  {}  {:<30}  {}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M:%S"),
        route,
        entry.query
    )
}
