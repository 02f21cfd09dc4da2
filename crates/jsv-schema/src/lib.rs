//! # jsv-schema: JSON Schema Validation with Custom Messages
//!
//! Declare a JSON Schema once and get a structured pass/fail result with
//! per-field diagnostics for any document.
//!
//! ## Pieces
//!
//! - [`Validator`]: owns a schema, its [`ErrorOverlay`], and the compiled
//!   engine form. Validates bytes, strings, or any `Serialize` value.
//! - [`ValidationResult`] / [`Diagnostic`]: the immutable outcome of one
//!   validation call.
//! - [`ErrorOverlay`]: author-supplied replacement messages read from
//!   `errorMessage` blocks in the schema.
//! - [`SchemaEngine`]: the constraint evaluator contract.
//!   [`JsonSchemaEngine`] is the default, backed by the `jsonschema` crate.
//! - [`ValidatorRegistry`]: validators keyed by name.
//!
//! ## Error Channels
//!
//! Operational failures (empty input, malformed schema, unreadable file,
//! unserializable value, engine failure) are `Err(ValidatorError)`. A
//! document that is invalid, including one that is not JSON at all, is
//! `Ok` with [`ValidationResult::is_valid`] returning `false`.
//!
//! ```
//! use jsv_schema::Validator;
//!
//! let validator = Validator::from_json_str(r#"{
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "minLength": 2}},
//!     "required": ["name"]
//! }"#).unwrap();
//!
//! let result = validator.validate_str(r#"{"name": "J"}"#).unwrap();
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].field, "name");
//! ```

pub mod engine;
pub mod error;
pub mod overlay;
pub mod path;
pub mod registry;
pub mod result;
pub mod validator;

pub use engine::{CompiledSchema, JsonSchemaEngine, RawViolation, SchemaEngine};
pub use error::{EngineError, ValidatorError};
pub use overlay::{ErrorOverlay, WILDCARD};
pub use registry::ValidatorRegistry;
pub use result::{Diagnostic, ValidationResult};
pub use validator::Validator;
