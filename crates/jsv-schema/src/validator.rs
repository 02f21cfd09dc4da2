//! # Validator
//!
//! Owns one schema document, its [`ErrorOverlay`], and the engine's compiled
//! form of the schema. Every entry point converges on [`Validator::validate_slice`].
//!
//! ## Thread Safety
//!
//! Nothing is mutated after construction. A `Validator` is `Send + Sync` and
//! can be shared (typically behind an `Arc`) by concurrent callers without
//! locking.
//!
//! ## Engine Failures
//!
//! The schema is compiled once, at construction. A schema the engine cannot
//! compile does not fail construction; the compile error is retained and
//! returned as [`ValidatorError::Engine`] from every validation call.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::engine::{CompiledSchema, JsonSchemaEngine, RawViolation, SchemaEngine};
use crate::error::{EngineError, ValidatorError};
use crate::overlay::ErrorOverlay;
use crate::path::{field_segments, overlay_key};
use crate::result::{Diagnostic, ValidationResult};

/// A JSON Schema validator with custom error message overlay.
#[derive(Clone)]
pub struct Validator {
    schema: Value,
    overlay: ErrorOverlay,
    compiled: Result<Arc<dyn CompiledSchema>, EngineError>,
}

impl Validator {
    /// Build a validator from a parsed schema using the given engine.
    pub fn new(schema: Value, engine: &dyn SchemaEngine) -> Self {
        let overlay = ErrorOverlay::from_schema(&schema);
        let compiled = engine.compile(&schema);

        match &compiled {
            Ok(_) => tracing::debug!(overlay_fields = overlay.len(), "validator constructed"),
            Err(e) => tracing::warn!(error = %e, "schema failed engine compilation"),
        }

        Self {
            schema,
            overlay,
            compiled,
        }
    }

    /// Build a validator from a parsed schema with the default engine.
    pub fn from_value(schema: Value) -> Self {
        Self::new(schema, &JsonSchemaEngine::default())
    }

    /// Build a validator from a schema file.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Validator::from_json_slice`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidatorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ValidatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Build a validator from a JSON Schema string.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::EmptyInput`] for empty or whitespace-only input,
    /// [`ValidatorError::MalformedSchema`] if the input is not JSON.
    pub fn from_json_str(schema: &str) -> Result<Self, ValidatorError> {
        Self::from_json_slice(schema.as_bytes())
    }

    /// Build a validator from JSON Schema bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::from_json_str`].
    pub fn from_json_slice(schema: &[u8]) -> Result<Self, ValidatorError> {
        if is_blank(schema) {
            return Err(ValidatorError::EmptyInput { what: "schema" });
        }
        let value: Value =
            serde_json::from_slice(schema).map_err(ValidatorError::MalformedSchema)?;
        Ok(Self::from_value(value))
    }

    /// The schema document this validator was built from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The custom message table extracted from the schema.
    pub fn overlay(&self) -> &ErrorOverlay {
        &self.overlay
    }

    /// Validate raw JSON bytes.
    ///
    /// Bytes that are not JSON produce `Ok` with a single root-level
    /// `format` diagnostic; they are invalid data, not an operational error.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::EmptyInput`] for empty or whitespace-only input,
    /// [`ValidatorError::Engine`] if the engine cannot evaluate.
    pub fn validate_slice(&self, document: &[u8]) -> Result<ValidationResult, ValidatorError> {
        if is_blank(document) {
            return Err(ValidatorError::EmptyInput { what: "document" });
        }

        let document: Value = match serde_json::from_slice(document) {
            Ok(value) => value,
            Err(e) => return Ok(ValidationResult::malformed(e)),
        };

        let compiled = self.compiled.as_ref().map_err(|e| e.clone())?;
        let violations = compiled.evaluate(&document)?;

        Ok(self.assemble(&document, violations))
    }

    /// Validate a JSON string. Equivalent to [`Validator::validate_slice`]
    /// over its bytes.
    pub fn validate_str(&self, document: &str) -> Result<ValidationResult, ValidatorError> {
        self.validate_slice(document.as_bytes())
    }

    /// Serialize a value to JSON, then validate the encoding.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Serialization`] if the value cannot be encoded,
    /// otherwise the errors of [`Validator::validate_slice`].
    pub fn validate_value<T>(&self, value: &T) -> Result<ValidationResult, ValidatorError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(ValidatorError::Serialization)?;
        self.validate_slice(&bytes)
    }

    fn assemble(&self, document: &Value, violations: Vec<RawViolation>) -> ValidationResult {
        let diagnostics = violations
            .into_iter()
            .map(|raw| {
                let segments = field_segments(&raw.field);
                let message = overlay_key(&segments, document)
                    .and_then(|key| self.overlay.lookup(key, &raw.constraint))
                    .map(str::to_string)
                    .unwrap_or(raw.description);
                Diagnostic {
                    field: segments.join("."),
                    message,
                    value: raw.value,
                    constraint: raw.constraint,
                    context: raw.context,
                }
            })
            .collect();

        ValidationResult::from_diagnostics(diagnostics)
    }
}

impl FromStr for Validator {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("overlay_fields", &self.overlay.len())
            .field("compiled", &self.compiled.is_ok())
            .finish()
    }
}

fn is_blank(input: &[u8]) -> bool {
    input.iter().all(u8::is_ascii_whitespace)
}
