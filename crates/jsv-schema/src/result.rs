//! # Validation Result Model
//!
//! The immutable value returned by every successful validation call.
//!
//! Wire shape:
//!
//! ```text
//! { "valid": bool,
//!   "errors": [ { "field": string, "message": string,
//!                 "value"?: any, "constraint"?: string, "context"?: string } ] }
//! ```
//!
//! `errors` is omitted when the document is valid.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Constraint keyword reported for documents that are not parseable JSON.
pub const MALFORMED_CONSTRAINT: &str = "format";

/// One public, overlay-substituted diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Dotted, root-relative field path. The root itself is `""`.
    pub field: String,
    /// Author-supplied overlay message, or the engine's default description.
    pub message: String,
    /// The offending value, when one exists. A JSON `null` offender is
    /// `Some(Value::Null)`, distinct from an absent value.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    /// Violated constraint keyword (e.g. `minLength`, `required`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub constraint: String,
    /// Structural context supplied by the engine (schema location).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A `value` key that is present, even as `null`, is a value.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.field, self.message)?;
        }
        if !self.constraint.is_empty() {
            write!(f, " [{}]", self.constraint)?;
        }
        Ok(())
    }
}

/// Outcome of validating one document.
///
/// `valid` is true iff the document parsed and produced zero diagnostics.
/// Diagnostics keep the engine's emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<Diagnostic>,
}

impl ValidationResult {
    /// A passing result with no diagnostics.
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a result from assembled diagnostics. Validity follows emptiness.
    pub fn from_diagnostics(errors: Vec<Diagnostic>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The single-diagnostic result for a document that is not parseable JSON.
    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self::unparseable("JSON", detail)
    }

    /// Like [`ValidationResult::malformed`], for documents supplied in
    /// another syntax (e.g. `"YAML"`).
    pub fn unparseable(syntax: &str, detail: impl fmt::Display) -> Self {
        Self {
            valid: false,
            errors: vec![Diagnostic {
                field: String::new(),
                message: format!("invalid {syntax}: {detail}"),
                value: None,
                constraint: MALFORMED_CONSTRAINT.to_string(),
                context: None,
            }],
        }
    }

    /// Whether the document satisfied the schema.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Diagnostics in emission order. Empty when valid.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Consumes self and returns the diagnostics.
    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "valid");
        }
        write!(f, "invalid ({} error(s))", self.errors.len())?;
        for d in &self.errors {
            write!(f, "\n  {d}")?;
        }
        Ok(())
    }
}
