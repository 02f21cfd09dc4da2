//! # jsv-api: HTTP Validation Layer
//!
//! Axum integration for `jsv-schema`: request-body validation that leaves
//! the body replayable, a configurable gate middleware, and a small demo
//! service built from a directory of schemas.
//!
//! ## API Surface
//!
//! | Route                           | Module                 | Purpose                         |
//! |---------------------------------|------------------------|---------------------------------|
//! | `/health/liveness`, `/readiness`| this module            | Probes                          |
//! | `/v1/schemas`                   | [`routes::schemas`]    | Registered keys                 |
//! | `/v1/schemas/{key}/validate`    | [`routes::schemas`]    | Validate a document             |
//! | `/v1/gate/{key}`                | [`routes::gate`]       | Echo behind a [`SchemaGate`]    |
//! | `/openapi.json`                 | [`openapi`]            | Generated OpenAPI document      |
//! | `/metrics`                      | [`middleware::metrics`]| Prometheus exposition           |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → SchemaGate (gated routes only) → Handler
//! ```
//!
//! ## Using the gate in another service
//!
//! ```ignore
//! use jsv_api::middleware::{MiddlewareConfig, SchemaGate};
//!
//! let gate = SchemaGate::with_config(
//!     Validator::from_path("schemas/user.schema.json")?,
//!     MiddlewareConfig::default().with_skip_methods([Method::GET]),
//! );
//! let app = gate.apply(Router::new().route("/users", post(create_user)));
//! ```

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod request;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

pub use error::{AppError, ErrorResponse};
pub use middleware::{GateOutcome, MiddlewareConfig, SchemaGate};
pub use request::{validate_request, RequestValidationError};
pub use state::{AppConfig, AppState};

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::schemas::router())
        .merge(openapi::router())
        .route("/health/readiness", get(readiness))
        .with_state(state.clone());

    let mut app = Router::new()
        .route("/health/liveness", get(liveness))
        .merge(api)
        .merge(routes::gate::router(&state));

    if let Some(handle) = state.metrics {
        app = app.merge(
            Router::new()
                .route("/metrics", get(middleware::metrics::render))
                .with_state(handle),
        );
    }

    app.layer(middleware::tracing_layer::layer())
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once at least one schema is registered.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.registry.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "no schemas loaded")
    } else {
        (StatusCode::OK, "ready")
    }
}
