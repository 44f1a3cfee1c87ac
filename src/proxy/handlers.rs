//! Proxy request handlers
//!
//! The forwarder rewrites an inbound request's origin to the configured
//! backend and relays the response verbatim. Any transport failure on the
//! upstream leg (refused connection, timeout, unreadable body) is absorbed:
//! the handler answers HTTP 200 with a synthetic envelope from the
//! fallback registry so the dashboard keeps rendering.

use crate::error::Result;
use crate::proxy::types::Envelope;
use crate::state::AppState;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Upper bound on a buffered request body
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Headers that must not be copied between the client and upstream legs
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Liveness endpoint for the proxy itself - GET /health or GET /
pub async fn health_check() -> impl IntoResponse {
    Json(Envelope::success_with_message("MarketDash dev proxy is running"))
}

/// Forwarding endpoint - any method under /api/* and /market/*
pub async fn forward_request(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let headers = request.headers().clone();

    let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("{} {} failed reading request body: {}", method, path, e);
            return fallback_response(&state, &path);
        }
    };

    match relay(&state, method.clone(), &path_and_query, &headers, body).await {
        Ok(response) => {
            state.set_upstream_reachable(true);
            info!("{} {} -> {}", method, path, response.status());
            response
        }
        Err(e) => {
            state.set_upstream_reachable(false);
            warn!("{} {} failed ({}), serving fallback data", method, path, e);
            fallback_response(&state, &path)
        }
    }
}

/// Forward one request to the backend and rebuild the response verbatim
async fn relay(
    state: &AppState,
    method: Method,
    path_and_query: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let url = format!("{}{}", state.config.backend_origin(), path_and_query);

    let mut outbound = HeaderMap::new();
    for (name, value) in headers {
        if !skip_request_header(name) {
            outbound.append(name.clone(), value.clone());
        }
    }

    let upstream = state
        .client
        .request(method, url)
        .headers(outbound)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    for (name, value) in &upstream_headers {
        if !skip_response_header(name) {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }

    Ok(response)
}

/// Build the always-200 synthetic response for a failed forward
fn fallback_response(state: &AppState, path: &str) -> Response {
    let envelope = state.fallbacks.respond(path);
    (StatusCode::OK, Json(envelope)).into_response()
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

// Host is rewritten by the client from the upstream URL; content-length is
// recomputed from the buffered body on each leg.
fn skip_request_header(name: &HeaderName) -> bool {
    is_hop_by_hop(name) || name == &header::HOST || name == &header::CONTENT_LENGTH
}

fn skip_response_header(name: &HeaderName) -> bool {
    is_hop_by_hop(name) || name == &header::CONTENT_LENGTH
}
