//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1
//! document served at `/openapi.json`. The gated echo endpoints are
//! generated from the registry at startup and are not part of it.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the validation service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JSV API",
        version = "0.1.0",
        description = "JSON Schema validation with per-field error messages: registry listing, document validation and schema-gated endpoints."
    ),
    paths(
        crate::routes::schemas::list_schemas,
        crate::routes::schemas::validate_document,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::routes::schemas::SchemaList,
        crate::routes::schemas::ValidationResultBody,
        crate::routes::schemas::DiagnosticBody,
    )),
    tags(
        (name = "schemas", description = "Schema registry and document validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
