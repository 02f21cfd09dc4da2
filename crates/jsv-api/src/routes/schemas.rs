//! # Schema Registry API
//!
//! Lists the registered schemas and validates arbitrary documents against
//! one of them. Invalid documents are a normal 200 response carrying
//! `"valid": false`; only operational failures map to error statuses.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsv_schema::ValidationResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Registered schema keys.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchemaList {
    pub count: usize,
    /// Sorted ascending.
    pub keys: Vec<String>,
}

/// Wire shape of a validation result, for the OpenAPI document.
#[derive(ToSchema)]
pub struct ValidationResultBody {
    pub valid: bool,
    /// Omitted when `valid` is true.
    pub errors: Option<Vec<DiagnosticBody>>,
}

/// Wire shape of one diagnostic, for the OpenAPI document.
#[derive(ToSchema)]
pub struct DiagnosticBody {
    /// Dotted path to the offending field; `""` for the document root.
    pub field: String,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
    /// Violated keyword, e.g. `minLength`.
    pub constraint: Option<String>,
    /// Schema location of the violated keyword.
    pub context: Option<String>,
}

/// Build the schemas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/schemas", get(list_schemas))
        .route("/v1/schemas/{key}/validate", post(validate_document))
}

/// GET /v1/schemas: List registered schema keys.
#[utoipa::path(
    get,
    path = "/v1/schemas",
    responses(
        (status = 200, description = "Registered schemas", body = SchemaList),
    ),
    tag = "schemas"
)]
pub async fn list_schemas(State(state): State<AppState>) -> Json<SchemaList> {
    let mut keys = state.registry.keys();
    keys.sort();
    Json(SchemaList {
        count: keys.len(),
        keys,
    })
}

/// POST /v1/schemas/{key}/validate: Validate the request body.
#[utoipa::path(
    post,
    path = "/v1/schemas/{key}/validate",
    params(("key" = String, Path, description = "Registry key of the schema")),
    request_body(content = serde_json::Value, content_type = "application/json"),
    responses(
        (status = 200, description = "Validation result, valid or not", body = ValidationResultBody),
        (status = 400, description = "Empty document", body = ErrorResponse),
        (status = 404, description = "Unknown schema key", body = ErrorResponse),
        (status = 413, description = "Body over the 2 MiB extractor limit"),
        (status = 500, description = "Validation could not be performed", body = ErrorResponse),
    ),
    tag = "schemas"
)]
pub async fn validate_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<ValidationResult>, AppError> {
    let validator = state
        .registry
        .get(&key)
        .ok_or_else(|| AppError::NotFound(format!("schema '{key}'")))?;
    let result = validator.validate_slice(&body)?;
    Ok(Json(result))
}
