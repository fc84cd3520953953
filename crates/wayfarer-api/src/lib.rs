//! Wayfarer API crate - axum HTTP server and route handlers.
//!
//! Exposes the advisory engine over JSON, both as a stateless lookup and
//! as a persisted history of past queries.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
