//! # Schema Evaluation Engine
//!
//! The constraint evaluation itself (types, `minLength`, `pattern`, `format`,
//! `allOf`/`anyOf`, `$ref` resolution) is delegated to an engine behind the
//! [`SchemaEngine`] trait. The validator only relies on this contract:
//!
//! 1. [`SchemaEngine::compile`] turns a schema document into a
//!    [`CompiledSchema`], or fails with [`EngineError`].
//! 2. [`CompiledSchema::evaluate`] returns the document's raw violations in
//!    emission order, or fails with [`EngineError`] when evaluation itself
//!    cannot be performed.
//!
//! [`JsonSchemaEngine`] is the default implementation, backed by the
//! `jsonschema` crate.
//!
//! ## Reference Resolution
//!
//! Remote `$ref` URIs are never fetched. Documents registered with
//! [`JsonSchemaEngine::with_resource`] are served from memory; any other
//! external reference fails compilation.

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, ValidationError};
use serde_json::Value;

use crate::error::EngineError;
use crate::path::pointer_join;

/// One unprocessed constraint failure reported by an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawViolation {
    /// Engine-native instance path (JSON Pointer, dotted, or `(root)`-prefixed).
    pub field: String,
    /// Violated constraint keyword.
    pub constraint: String,
    /// The offending value, if any.
    pub value: Option<Value>,
    /// Structural context (typically the schema location).
    pub context: Option<String>,
    /// Engine default human-readable description.
    pub description: String,
}

/// A schema prepared for repeated evaluation.
pub trait CompiledSchema: Send + Sync {
    /// Evaluate a parsed document, returning violations in emission order.
    fn evaluate(&self, document: &Value) -> Result<Vec<RawViolation>, EngineError>;
}

/// Pluggable JSON Schema evaluation engine.
pub trait SchemaEngine: Send + Sync {
    /// Prepare a schema document for evaluation.
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, EngineError>;
}

/// Serves pre-registered documents for `$ref` resolution without network access.
struct OfflineRetriever {
    documents: HashMap<String, Value>,
}

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.documents.get(uri_str) {
            return Ok(value.clone());
        }

        // Fall back to a fragment-less match so `base.json#` hits `base.json`.
        let bare = uri_str.split('#').next().unwrap_or(uri_str);
        self.documents
            .get(bare)
            .cloned()
            .ok_or_else(|| format!("external reference '{uri_str}' is not registered").into())
    }
}

/// [`SchemaEngine`] backed by the `jsonschema` crate.
///
/// Format assertions are always on, so `"format": "email"` rejects
/// non-addresses regardless of draft.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaEngine {
    draft: Option<Draft>,
    resources: HashMap<String, Value>,
}

impl JsonSchemaEngine {
    /// Engine with draft auto-detection from `$schema`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the draft used when a schema carries no `$schema` keyword.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Register a document that `$ref` may point to by URI.
    pub fn with_resource(mut self, uri: impl Into<String>, document: Value) -> Self {
        self.resources.insert(uri.into(), document);
        self
    }

    /// Number of registered `$ref` documents.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl SchemaEngine for JsonSchemaEngine {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, EngineError> {
        let mut opts = jsonschema::options();
        opts.should_validate_formats(true);
        if let Some(draft) = self.draft {
            opts.with_draft(draft);
        }
        opts.with_retriever(OfflineRetriever {
            documents: self.resources.clone(),
        });

        let validator = opts
            .build(schema)
            .map_err(|e| EngineError::new(format!("schema cannot be compiled: {e}")))?;

        Ok(Arc::new(JsonSchemaCompiled { validator }))
    }
}

struct JsonSchemaCompiled {
    validator: jsonschema::Validator,
}

impl CompiledSchema for JsonSchemaCompiled {
    fn evaluate(&self, document: &Value) -> Result<Vec<RawViolation>, EngineError> {
        Ok(self.validator.iter_errors(document).map(to_raw).collect())
    }
}

fn to_raw(error: ValidationError<'_>) -> RawViolation {
    let description = error.to_string();
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let constraint = constraint_keyword(&schema_path);

    let (field, value) = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = match property {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (pointer_join(&instance_path, &name), None)
        }
        _ => (instance_path, Some(error.instance.into_owned())),
    };

    RawViolation {
        field,
        constraint,
        value,
        context: (!schema_path.is_empty()).then_some(schema_path),
        description,
    }
}

/// The keyword a schema location ends in, skipping trailing array indices
/// (`/allOf/1` names `allOf`).
fn constraint_keyword(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or("schema")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluate(schema: Value, document: Value) -> Vec<RawViolation> {
        JsonSchemaEngine::new()
            .compile(&schema)
            .unwrap()
            .evaluate(&document)
            .unwrap()
    }

    #[test]
    fn constraint_keyword_is_last_named_segment() {
        assert_eq!(constraint_keyword("/properties/name/minLength"), "minLength");
        assert_eq!(constraint_keyword("/required"), "required");
        assert_eq!(constraint_keyword("/allOf/1"), "allOf");
        assert_eq!(constraint_keyword(""), "schema");
    }

    #[test]
    fn min_length_violation_maps_fields() {
        let violations = evaluate(
            json!({"type": "object", "properties": {"name": {"type": "string", "minLength": 2}}}),
            json!({"name": "J"}),
        );
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.field, "/name");
        assert_eq!(v.constraint, "minLength");
        assert_eq!(v.value, Some(json!("J")));
        assert_eq!(v.context.as_deref(), Some("/properties/name/minLength"));
        assert!(!v.description.is_empty());
    }

    #[test]
    fn required_violation_names_missing_property() {
        let violations = evaluate(
            json!({"type": "object", "required": ["email"]}),
            json!({}),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "/email");
        assert_eq!(violations[0].constraint, "required");
        assert_eq!(violations[0].value, None);
    }

    #[test]
    fn formats_are_asserted() {
        let violations = evaluate(
            json!({"type": "string", "format": "email"}),
            json!("not-an-email"),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "format");
        assert_eq!(violations[0].field, "");
    }

    #[test]
    fn invalid_schema_fails_compilation() {
        let err = JsonSchemaEngine::new()
            .compile(&json!({"type": 12}))
            .err()
            .unwrap();
        assert!(err.reason().contains("cannot be compiled"), "got: {err}");
    }

    #[test]
    fn unregistered_remote_ref_fails_compilation() {
        let result = JsonSchemaEngine::new()
            .compile(&json!({"$ref": "https://schemas.example.test/address.json"}));
        assert!(result.is_err());
    }

    #[test]
    fn registered_resource_resolves_ref() {
        let engine = JsonSchemaEngine::new().with_resource(
            "https://schemas.example.test/address.json",
            json!({"type": "object", "required": ["city"]}),
        );
        assert_eq!(engine.resource_count(), 1);
        let compiled = engine
            .compile(&json!({"$ref": "https://schemas.example.test/address.json"}))
            .unwrap();
        let violations = compiled.evaluate(&json!({})).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "/city");
    }
}
