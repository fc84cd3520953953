//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use wayfarer_advisory::AdvisoryEngine;
use wayfarer_core::config::WayfarerConfig;
use wayfarer_storage::{Database, HistoryRepository};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The
/// configuration is read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WayfarerConfig>,
    pub engine: Arc<AdvisoryEngine>,
    pub history: Arc<HistoryRepository>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: WayfarerConfig, database: Arc<Database>) -> Self {
        let engine = AdvisoryEngine::new(&config.advisory);
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            history: Arc::new(HistoryRepository::new(database)),
            start_time: Instant::now(),
        }
    }
}
