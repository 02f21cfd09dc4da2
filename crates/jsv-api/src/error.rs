//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error response, including the gate's default rejection, uses the
//! same JSON body:
//!
//! ```text
//! { "error": string, "details"?: [ <diagnostic>* ] }
//! ```
//!
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsv_schema::{Diagnostic, ValidatorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::request::RequestValidationError;

/// Message returned in place of any internal error detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Structured JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable summary.
    pub error: String,
    /// Per-field diagnostics, present only for rejected request bodies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub details: Vec<Diagnostic>,
}

impl ErrorResponse {
    /// A body with a summary and no diagnostics.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent unusable input, such as an empty body (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body is over the configured size limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Empty input is the caller's fault; every other validator failure is ours.
impl From<ValidatorError> for AppError {
    fn from(err: ValidatorError) -> Self {
        if err.is_empty_input() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<RequestValidationError> for AppError {
    fn from(err: RequestValidationError) -> Self {
        match err {
            RequestValidationError::Validator(inner) => inner.into(),
            too_large @ RequestValidationError::TooLarge { .. } => {
                Self::PayloadTooLarge(too_large.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}
