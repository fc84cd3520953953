//! API error types and JSON error response formatting.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use wayfarer_advisory::AdvisoryError;
use wayfarer_core::error::WayfarerError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - history entry does not exist.
    NotFound(String),
    /// 413 Payload Too Large - body exceeded the configured limit.
    PayloadTooLarge(String),
    /// 429 Too Many Requests - client exceeded its window.
    TooManyRequests(String),
    /// 500 Internal Server Error - the message is passed through.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code().to_string();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!(%message, "Request failed");
        }

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<WayfarerError> for ApiError {
    fn from(err: WayfarerError) -> Self {
        match err {
            WayfarerError::InvalidInput(msg) => ApiError::BadRequest(msg),
            WayfarerError::NotFound(msg) => ApiError::NotFound(msg),
            WayfarerError::RateLimited => ApiError::TooManyRequests(err.to_string()),
            WayfarerError::UnexpectedFailure(msg) => ApiError::Internal(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AdvisoryError> for ApiError {
    fn from(err: AdvisoryError) -> Self {
        WayfarerError::from(err).into()
    }
}

/// Every malformed body is a 400, except an oversized one.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err: ApiError = WayfarerError::InvalidInput("empty".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "empty"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unexpected_failure_keeps_message() {
        let err: ApiError = WayfarerError::UnexpectedFailure("boom".to_string()).into();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "boom"));
    }

    #[test]
    fn test_not_found_keeps_inner_message() {
        let err: ApiError = WayfarerError::NotFound("Query 9 not found".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Query 9 not found"));
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err: ApiError = WayfarerError::Storage("disk full".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("disk full")));
    }

    #[test]
    fn test_advisory_error_is_internal() {
        let err: ApiError = AdvisoryError::EmptyDestination {
            query: "to ?".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rate_limited_is_429() {
        let err: ApiError = WayfarerError::RateLimited.into();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.code(), "too_many_requests");
    }
}
