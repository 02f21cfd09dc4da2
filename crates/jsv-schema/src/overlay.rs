//! # Error Message Overlay
//!
//! JSON Schema has no native way to attach custom error text. This module
//! reads an `errorMessage` extension block next to property definitions and
//! turns it into a lookup table consulted after evaluation:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "email": {
//!       "type": "string",
//!       "format": "email",
//!       "errorMessage": { "format": "bad email", "_": "email is invalid" }
//!     },
//!     "nickname": { "type": "string", "errorMessage": "nickname must be text" }
//!   },
//!   "required": ["email"],
//!   "errorMessage": { "required": { "email": "email is required" } }
//! }
//! ```
//!
//! - Per-property object: keys are constraint keywords, or `_` for any
//!   constraint on that field.
//! - Per-property string: shorthand for `{"_": "..."}`.
//! - Schema-level `errorMessage.required`: maps required field names to the
//!   message used for that field's `required` violation.
//!
//! Array schemas contribute their `items` definition the same way.
//!
//! The table is built once per schema and never touched on the validation
//! path except for lookups.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the extension keyword carrying custom messages.
pub const ERROR_MESSAGE_KEYWORD: &str = "errorMessage";

/// Constraint key matching any constraint on a field.
pub const WILDCARD: &str = "_";

const REQUIRED: &str = "required";

/// Field name → (constraint keyword or [`WILDCARD`]) → replacement message.
///
/// Absence of a field means every constraint on it keeps the engine's
/// default description. All keys are non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorOverlay {
    fields: BTreeMap<String, BTreeMap<String, String>>,
}

impl ErrorOverlay {
    /// Extract the overlay from a parsed schema document.
    pub fn from_schema(schema: &Value) -> Self {
        let mut overlay = Self::default();
        overlay.collect(schema);

        if let Some(items) = schema.get("items").filter(|i| i.is_object()) {
            overlay.collect(items);
        }

        overlay
    }

    fn collect(&mut self, definition: &Value) {
        if let Some(properties) = definition.get("properties").and_then(Value::as_object) {
            for (field, property) in properties {
                match property.get(ERROR_MESSAGE_KEYWORD) {
                    Some(Value::Object(block)) => self.insert_block(field, block),
                    Some(Value::String(message)) => self.insert(field, WILDCARD, message),
                    _ => {}
                }
            }
        }

        let required_block = definition
            .get(ERROR_MESSAGE_KEYWORD)
            .and_then(|block| block.get(REQUIRED))
            .and_then(Value::as_object);
        if let Some(required) = required_block {
            for (field, message) in required {
                if let Some(message) = message.as_str() {
                    self.insert(field, REQUIRED, message);
                }
            }
        }
    }

    fn insert_block(&mut self, field: &str, block: &Map<String, Value>) {
        for (constraint, message) in block {
            if let Some(message) = message.as_str() {
                self.insert(field, constraint, message);
            }
        }
    }

    fn insert(&mut self, field: &str, constraint: &str, message: &str) {
        if field.is_empty() || constraint.is_empty() {
            return;
        }
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(constraint.to_string(), message.to_string());
    }

    /// Look up a replacement message: exact constraint first, then wildcard.
    pub fn lookup(&self, field: &str, constraint: &str) -> Option<&str> {
        let messages = self.fields.get(field)?;
        messages
            .get(constraint)
            .or_else(|| messages.get(WILDCARD))
            .map(String::as_str)
    }

    /// All messages declared for one field.
    pub fn messages_for(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.fields.get(field)
    }

    /// Annotated field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of annotated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declared no overlay messages.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
