//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its inputs via axum extractors, runs the advisory
//! engine or history repository from AppState, and returns JSON.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wayfarer_core::error::WayfarerError;
use wayfarer_core::types::{self, AdvisoryRecord, HistoryEntry, RouteHints, EMPTY_QUERY_MESSAGE};

use crate::error::ApiError;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Request / response types
// =============================================================================

/// Body for both query endpoints.
///
/// `query` stays untyped so that a missing or non-string value yields the
/// same validation error as an empty one.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<serde_json::Value>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl QueryRequest {
    fn parse(self) -> Result<(types::Query, RouteHints), ApiError> {
        let raw = self
            .query
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ApiError::BadRequest(EMPTY_QUERY_MESSAGE.to_string()))?;
        let query = types::Query::parse(raw)?;
        Ok((query, RouteHints::new(self.destination, self.origin)))
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub history_entries: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - welcome message.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Wayfarer travel advisory API".to_string(),
        version: VERSION.to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let history_entries = state.history.count()?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        history_entries,
    }))
}

/// POST /api/query - bare advisory record, nothing is stored.
pub async fn query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<AdvisoryRecord>, ApiError> {
    let Json(request) = body?;
    let (query, hints) = request.parse()?;

    let record = state.engine.advise(&query, &hints)?;
    debug!(destination = %record.destination, "Advisory generated");
    Ok(Json(record))
}

/// POST /api/v1/query - advisory record saved to history.
pub async fn create_query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let Json(request) = body?;
    let (query, hints) = request.parse()?;

    let record = state.engine.advise(&query, &hints)?;
    let entry = state.history.append(&query, &record)?;
    info!(entry_id = entry.id, destination = %entry.destination, "Query recorded");
    Ok(Json(entry))
}

/// GET /api/v1/history?limit=N
pub async fn list_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let Query(params) = params?;
    let limits = &state.config.history;
    let limit = params
        .limit
        .unwrap_or(limits.default_limit)
        .min(limits.max_limit);

    let entries = state.history.list(Some(limit))?;
    Ok(Json(entries))
}

/// GET /api/v1/history/{id}
pub async fn get_history(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let Path(id) = id?;
    state
        .history
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| not_found(id).into())
}

/// DELETE /api/v1/history/{id}
pub async fn delete_history(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    if !state.history.delete_by_id(id)? {
        return Err(not_found(id).into());
    }
    Ok(Json(MessageResponse {
        message: "Query deleted successfully".to_string(),
    }))
}

/// DELETE /api/v1/history
pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted = state.history.clear()?;
    Ok(Json(ClearResponse { deleted }))
}

fn not_found(id: i64) -> WayfarerError {
    WayfarerError::NotFound(format!("Query {} not found", id))
}
