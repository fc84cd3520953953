//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, the
//! per-client rate limiter and all endpoint handlers.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use wayfarer_core::config::{ServerConfig, WayfarerConfig};
use wayfarer_core::error::WayfarerError;

use crate::error::ApiError;
use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Maximum accepted request body.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors = cors_layer(server);
    let limiter = RateLimiter::new(
        server.rate_limit_requests,
        Duration::from_secs(server.rate_limit_window_secs),
    );

    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    let api_routes = Router::new()
        .route("/api/query", post(handlers::query))
        .route("/api/v1/query", post(handlers::create_query))
        .route(
            "/api/v1/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route(
            "/api/v1/history/{id}",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(limiter));

    with_middleware(public_routes.merge(api_routes), cors).with_state(state)
}

/// Shared middleware stack. Each layer is applied with its own
/// `Router::layer` call so the response body is re-boxed between them;
/// `Cors` needs a body that implements `Default`.
fn with_middleware<S>(router: Router<S>, cors: CorsLayer) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Turn a handler panic into the JSON 500 body used for every other
/// unexpected failure.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unexpected failure while handling the request".to_string()
    };
    ApiError::Internal(message).into_response()
}

/// CORS restricted to the configured origins. Unparseable origins are
/// skipped with a warning.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &WayfarerConfig, state: AppState) -> Result<(), WayfarerError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WayfarerError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| WayfarerError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
