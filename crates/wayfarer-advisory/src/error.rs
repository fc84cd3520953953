//! Error types for the advisory engine.

use wayfarer_core::error::WayfarerError;

/// Errors from route resolution and advisory synthesis.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("No destination could be resolved for query: {query}")]
    EmptyDestination { query: String },
}

impl From<AdvisoryError> for WayfarerError {
    fn from(err: AdvisoryError) -> Self {
        WayfarerError::UnexpectedFailure(err.to_string())
    }
}
