//! # Gated Echo Endpoints
//!
//! Mounts `/v1/gate/{key}` for every registered schema. Each endpoint sits
//! behind its own [`SchemaGate`] and echoes the request body it receives,
//! which makes gate decisions and body replay visible from the outside.
//!
//! Routes are built from the registry contents when the router is
//! assembled; schemas registered later are not mounted.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use crate::middleware::SchemaGate;
use crate::state::AppState;

/// Whether `key` can be embedded in a route path as a literal segment.
pub fn is_route_safe(key: &str) -> bool {
    !key.trim_matches('.').is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Build the gated echo router from the current registry contents.
pub fn router(state: &AppState) -> Router {
    let mut keys = state.registry.keys();
    keys.sort();

    let mut router = Router::new();
    for key in keys {
        if !is_route_safe(&key) {
            tracing::warn!(key = %key, "schema key cannot be used in a route path, not mounted");
            continue;
        }
        let Some(validator) = state.registry.get(&key) else {
            continue;
        };
        let gate = SchemaGate::with_config(validator, Arc::clone(&state.gate_config));
        let route = Router::new().route(&format!("/v1/gate/{key}"), any(echo));
        router = router.merge(gate.apply(route));
    }
    router
}

/// Return the body as received, with its content type.
async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    ([(CONTENT_TYPE, content_type)], body).into_response()
}
