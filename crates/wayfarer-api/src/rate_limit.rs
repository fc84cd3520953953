//! Per-client fixed-window rate limiter middleware.
//!
//! Each client gets `max_requests` per window. The client key is the peer
//! IP taken from `ConnectInfo`, or `"unknown"` when the server was not
//! started with connect info (e.g. in tests).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;

const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Clients {
    windows: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Shared state for the rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Arc<Mutex<Clients>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(Clients {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Record a request from `client` and report whether it is allowed.
    pub fn try_acquire(&self, client: &str) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: &str, now: Instant) -> bool {
        let Ok(mut clients) = self.clients.lock() else {
            // A poisoned map only loses counters; keep serving.
            return true;
        };

        // Sweep expired windows at most once per window length.
        let window = self.window;
        if now.duration_since(clients.last_sweep) >= window {
            clients
                .windows
                .retain(|_, w| now.duration_since(w.started) < window);
            clients.last_sweep = now;
        }

        let fresh = Window {
            started: now,
            count: 0,
        };
        let entry = clients
            .windows
            .entry(client.to_string())
            .or_insert(fresh);
        if now.duration_since(entry.started) >= window {
            *entry = fresh;
        }
        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// Client key for a request: the peer IP when known.
pub fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Axum middleware that enforces the rate limit.
pub async fn rate_limit_middleware(
    axum::extract::Extension(limiter): axum::extract::Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    if limiter.try_acquire(&client) {
        next.run(req).await
    } else {
        warn!(%client, path = %req.uri().path(), "Rate limit exceeded");
        ApiError::TooManyRequests("Too many requests, please try again later".to_string())
            .into_response()
    }
}
