//! # Schema Gate
//!
//! Request-body validation middleware. For each request:
//!
//! ```text
//! method exempt? ── yes ──▶ Skipped   ──▶ downstream handler
//!       │ no
//!       ▼
//! validate body ── Ok(valid)    ──▶ Accepted ──▶ downstream handler
//!               ── Ok(invalid)  ──▶ Rejected ──▶ error responder (400 by default)
//!               ── Err(_)       ──▶ Errored  ──▶ 413 past the body limit,
//!                                                 otherwise 500 (detail logged only)
//! ```
//!
//! Downstream handlers never see rejected or errored requests. The body is
//! re-attached after validation, so accepted requests reach the handler
//! with their original bytes. At most `max_body_bytes` are buffered
//! (2 MiB by default, matching axum's extractor limit).
//!
//! ```ignore
//! let gate = SchemaGate::new(Validator::from_path("user.schema.json")?);
//! let app = gate.apply(Router::new().route("/users", post(create_user)));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use jsv_schema::{ValidationResult, Validator};

use crate::error::{AppError, ErrorResponse};
use crate::middleware::metrics::record_gate_outcome;
use crate::request::{validate_request, RequestValidationError};

/// Methods exempt from validation unless configured otherwise.
pub const DEFAULT_SKIP_METHODS: [Method; 4] =
    [Method::GET, Method::DELETE, Method::HEAD, Method::OPTIONS];

/// Summary used by the default rejection payload.
pub const REJECTION_MESSAGE: &str = "invalid request body";

/// Body size the gate buffers before answering 413.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Builds the response for a rejected request.
pub type ErrorResponder = Arc<dyn Fn(&Request, &ValidationResult) -> Response + Send + Sync>;

/// Per-pipeline gate settings: exempt methods, body size limit and the
/// rejection responder.
#[derive(Clone)]
pub struct MiddlewareConfig {
    skip_methods: HashSet<Method>,
    max_body_bytes: usize,
    error_responder: Option<ErrorResponder>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            skip_methods: DEFAULT_SKIP_METHODS.into_iter().collect(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            error_responder: None,
        }
    }
}

impl MiddlewareConfig {
    /// Replace the exempt method set. An empty set validates every method.
    pub fn with_skip_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.skip_methods = methods.into_iter().collect();
        self
    }

    /// Cap the number of body bytes read for validation.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Use a custom responder for rejected requests.
    pub fn with_error_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&Request, &ValidationResult) -> Response + Send + Sync + 'static,
    {
        self.error_responder = Some(Arc::new(responder));
        self
    }

    /// Whether requests with this method bypass validation.
    pub fn skips(&self, method: &Method) -> bool {
        self.skip_methods.contains(method)
    }

    /// Exempt methods, in no particular order.
    pub fn skip_methods(&self) -> impl Iterator<Item = &Method> {
        self.skip_methods.iter()
    }

    /// Largest body the gate will buffer.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    fn respond(&self, request: &Request, result: &ValidationResult) -> Response {
        match &self.error_responder {
            Some(responder) => responder(request, result),
            None => default_error_responder(request, result),
        }
    }
}

impl fmt::Debug for MiddlewareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.skip_methods.iter().map(Method::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("MiddlewareConfig")
            .field("skip_methods", &methods)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("custom_responder", &self.error_responder.is_some())
            .finish()
    }
}

/// 400 with `{"error": "invalid request body", "details": [...]}`.
pub fn default_error_responder(_request: &Request, result: &ValidationResult) -> Response {
    let body = ErrorResponse {
        error: REJECTION_MESSAGE.to_string(),
        details: result.errors().to_vec(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Dispatcher state reached for one request.
#[derive(Debug)]
pub enum GateOutcome {
    /// Method is exempt; validation never ran.
    Skipped,
    /// Body validated successfully.
    Accepted,
    /// Body failed validation.
    Rejected(ValidationResult),
    /// Validation could not be performed.
    Errored(RequestValidationError),
}

impl GateOutcome {
    /// Whether the downstream handler runs.
    pub fn passes(&self) -> bool {
        matches!(self, Self::Skipped | Self::Accepted)
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Accepted => "accepted",
            Self::Rejected(_) => "rejected",
            Self::Errored(_) => "errored",
        }
    }
}

/// A validator bound to a middleware configuration.
#[derive(Debug, Clone)]
pub struct SchemaGate {
    validator: Arc<Validator>,
    config: Arc<MiddlewareConfig>,
}

impl SchemaGate {
    /// Gate with the default configuration.
    pub fn new(validator: impl Into<Arc<Validator>>) -> Self {
        Self::with_config(validator, MiddlewareConfig::default())
    }

    /// Gate with an explicit configuration.
    pub fn with_config(
        validator: impl Into<Arc<Validator>>,
        config: impl Into<Arc<MiddlewareConfig>>,
    ) -> Self {
        Self {
            validator: validator.into(),
            config: config.into(),
        }
    }

    /// The validator applied to request bodies.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// The active configuration.
    pub fn config(&self) -> &MiddlewareConfig {
        &self.config
    }

    /// Decide what happens to a request. The body stays replayable.
    pub async fn inspect(&self, request: &mut Request) -> GateOutcome {
        if self.config.skips(request.method()) {
            tracing::debug!(method = %request.method(), "validation skipped for exempt method");
            return GateOutcome::Skipped;
        }

        match validate_request(&self.validator, request, self.config.max_body_bytes).await {
            Ok(result) if result.is_valid() => GateOutcome::Accepted,
            Ok(result) => {
                tracing::info!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    errors = result.errors().len(),
                    "request body rejected"
                );
                GateOutcome::Rejected(result)
            }
            Err(err) => {
                tracing::debug!(method = %request.method(), error = %err, "request body not validated");
                GateOutcome::Errored(err)
            }
        }
    }

    /// Wrap every route of `router` with this gate.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(from_fn_with_state(self, schema_gate))
    }
}

/// Middleware function; mount with `axum::middleware::from_fn_with_state`.
pub async fn schema_gate(
    State(gate): State<SchemaGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = gate.inspect(&mut request).await;
    record_gate_outcome(outcome.label());

    match outcome {
        GateOutcome::Skipped | GateOutcome::Accepted => next.run(request).await,
        GateOutcome::Rejected(result) => gate.config.respond(&request, &result),
        GateOutcome::Errored(err @ RequestValidationError::TooLarge { .. }) => {
            AppError::PayloadTooLarge(err.to_string()).into_response()
        }
        GateOutcome::Errored(err) => AppError::Internal(err.to_string()).into_response(),
    }
}
