//! # Integration Tests for jsv-api
//!
//! Drives the assembled router: health probes, the schema listing and
//! validation endpoints, gated echo endpoints (pass-through, rejection,
//! replay, operational failure) and the OpenAPI document.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use jsv_api::state::AppState;
use jsv_api::MiddlewareConfig;
use jsv_schema::{CompiledSchema, EngineError, SchemaEngine, Validator, ValidatorRegistry};

const USER_SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "properties": {
        "name": {
            "type": "string",
            "minLength": 2,
            "errorMessage": {"minLength": "Name must have at least 2 characters"}
        },
        "email": {
            "type": "string",
            "format": "email",
            "errorMessage": {"format": "bad email"}
        }
    },
    "required": ["name", "email"],
    "errorMessage": {"required": {"email": "Email is required"}}
}"#;

struct BrokenEngine;

impl SchemaEngine for BrokenEngine {
    fn compile(&self, _schema: &Value) -> Result<Arc<dyn CompiledSchema>, EngineError> {
        Err(EngineError::new("unresolvable $ref: http://internal.example/secret"))
    }
}

fn registry() -> ValidatorRegistry {
    let registry = ValidatorRegistry::new();
    registry.add_from_json_str("user", USER_SCHEMA).unwrap();
    registry.add("broken", Validator::new(json!({"type": "object"}), &BrokenEngine));
    registry
}

/// Helper: build the test app over the standard registry.
fn test_app() -> axum::Router {
    jsv_api::app(AppState::new(registry()))
}

fn test_app_with(config: MiddlewareConfig) -> axum::Router {
    jsv_api::app(AppState::new(registry()).with_gate_config(config))
}

fn request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(request(Method::GET, "/health/liveness", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_requires_schemas() {
    let ready = test_app()
        .oneshot(request(Method::GET, "/health/readiness", ""))
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);

    let empty = jsv_api::app(AppState::new(ValidatorRegistry::new()))
        .oneshot(request(Method::GET, "/health/readiness", ""))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// -- Schema Registry API ------------------------------------------------------

#[tokio::test]
async fn test_list_schemas_sorted() {
    let response = test_app()
        .oneshot(request(Method::GET, "/v1/schemas", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"count": 2, "keys": ["broken", "user"]})
    );
}

#[tokio::test]
async fn test_validate_endpoint_valid_document() {
    let response = test_app()
        .oneshot(request(
            Method::POST,
            "/v1/schemas/user/validate",
            r#"{"name": "Ana", "email": "ana@test.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"valid": true}));
}

#[tokio::test]
async fn test_validate_endpoint_invalid_document_is_200() {
    let response = test_app()
        .oneshot(request(
            Method::POST,
            "/v1/schemas/user/validate",
            r#"{"name": "J"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    let messages: Vec<&str> = errors.iter().map(|e| e["message"].as_str().unwrap()).collect();
    assert!(messages.contains(&"Name must have at least 2 characters"));
    assert!(messages.contains(&"Email is required"));
}

#[tokio::test]
async fn test_validate_endpoint_unknown_key_is_404() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/schemas/order/validate", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("order"));
}

#[tokio::test]
async fn test_validate_endpoint_empty_body_is_400() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/schemas/user/validate", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_endpoint_engine_failure_is_500() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/schemas/broken/validate", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(!body.contains("internal.example"), "detail leaked: {body}");
    assert!(body.contains("An internal error occurred"));
}

// -- Gated Endpoints ----------------------------------------------------------

#[tokio::test]
async fn test_gate_accepts_and_replays_body() {
    let doc = r#"{"name": "João Silva", "email": "joao@exemplo.com"}"#;
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/gate/user", doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(body_string(response).await, doc);
}

#[tokio::test]
async fn test_gate_rejects_invalid_body() {
    let response = test_app()
        .oneshot(request(
            Method::POST,
            "/v1/gate/user",
            r#"{"name": "João", "email": "nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid request body");
    assert_eq!(body["details"][0]["field"], "email");
    assert_eq!(body["details"][0]["message"], "bad email");
    assert_eq!(body["details"][0]["constraint"], "format");
    assert_eq!(body["details"][0]["value"], "nope");
}

#[tokio::test]
async fn test_gate_validates_put_and_patch() {
    for method in [Method::PUT, Method::PATCH] {
        let response = test_app()
            .oneshot(request(method.clone(), "/v1/gate/user", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
    }
}

#[tokio::test]
async fn test_gate_skips_get_with_invalid_body() {
    let response = test_app()
        .oneshot(request(Method::GET, "/v1/gate/user", "not even json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "not even json");
}

#[tokio::test]
async fn test_gate_empty_skip_set_validates_get() {
    let app = test_app_with(MiddlewareConfig::default().with_skip_methods([]));
    let response = app
        .oneshot(request(Method::GET, "/v1/gate/user", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_gate_custom_responder() {
    let config = MiddlewareConfig::default().with_error_responder(|_request, result| {
        let fields: Vec<&str> = result.errors().iter().map(|d| d.field.as_str()).collect();
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"success": false, "fields": fields})),
        )
            .into_response()
    });
    let response = test_app_with(config)
        .oneshot(request(Method::POST, "/v1/gate/user", r#"{"name": "Ana"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"success": false, "fields": ["email"]})
    );
}

#[tokio::test]
async fn test_gate_engine_failure_is_500() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/gate/broken", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "An internal error occurred"})
    );
}

#[tokio::test]
async fn test_gate_empty_body_is_500() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/gate/user", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_gate_oversized_body_is_413() {
    let app = test_app_with(MiddlewareConfig::default().with_max_body_bytes(128));
    let doc = format!(r#"{{"name": "{}", "email": "a@b.co"}}"#, "x".repeat(4096));
    let response = app
        .oneshot(request(Method::POST, "/v1/gate/user", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert!(body.get("details").is_none(), "oversized body was validated: {body}");
}

#[tokio::test]
async fn test_gate_unknown_key_is_404() {
    let response = test_app()
        .oneshot(request(Method::POST, "/v1/gate/order", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsafe_registry_key_is_not_mounted() {
    let registry = registry();
    registry.add_from_json_str("a b", r#"{"type": "object"}"#).unwrap();
    let app = jsv_api::app(AppState::new(registry));
    let response = app
        .oneshot(request(Method::GET, "/v1/schemas", ""))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 3);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document() {
    let response = test_app()
        .oneshot(request(Method::GET, "/openapi.json", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert!(body["paths"]["/v1/schemas/{key}/validate"]["post"].is_object());
}

#[tokio::test]
async fn test_metrics_absent_without_recorder() {
    let response = test_app()
        .oneshot(request(Method::GET, "/metrics", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
