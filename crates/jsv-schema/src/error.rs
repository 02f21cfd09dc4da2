//! # Error Types
//!
//! Operational errors for validator construction and validation calls.
//!
//! ## Design
//!
//! Two channels are kept apart:
//!
//! - **Operational errors** (this module): caller misuse or environment
//!   failure. Empty input, malformed schema JSON, unreadable files,
//!   unserializable values, and engine failures. Always returned as `Err`.
//! - **Data invalidity**: the document fails the schema or is not JSON at
//!   all. Never an error; always `Ok(ValidationResult)` with `valid = false`.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised by the schema evaluation engine itself, as opposed to a
/// constraint violation in the document.
///
/// Carries only a reason string so that a compile failure retained by a
/// [`Validator`](crate::Validator) can be re-reported on every call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EngineError {
    reason: String,
}

impl EngineError {
    /// Create an engine error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The human-readable failure reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Operational error from a [`Validator`](crate::Validator) constructor or
/// validation entry point.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Schema or document input was empty or whitespace-only.
    #[error("{what} must not be empty")]
    EmptyInput {
        /// Which input was empty ("schema" or "document").
        what: &'static str,
    },

    /// The schema input is not parseable JSON.
    #[error("malformed schema JSON: {0}")]
    MalformedSchema(#[source] serde_json::Error),

    /// A schema file could not be opened or read.
    #[error("cannot read schema file '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A structured value could not be encoded as JSON.
    #[error("cannot serialize value to JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The evaluation engine could not evaluate the document.
    #[error("schema evaluation failed: {0}")]
    Engine(#[from] EngineError),
}

impl ValidatorError {
    /// Returns true if the error stems from empty caller input.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_display_names_the_input() {
        let err = ValidatorError::EmptyInput { what: "schema" };
        assert_eq!(err.to_string(), "schema must not be empty");
        assert!(err.is_empty_input());
    }

    #[test]
    fn io_display_includes_path() {
        let err = ValidatorError::Io {
            path: PathBuf::from("/tmp/missing.schema.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.schema.json"), "got: {msg}");
        assert!(!err.is_empty_input());
    }

    #[test]
    fn engine_error_converts() {
        let err: ValidatorError = EngineError::new("unknown draft").into();
        assert!(matches!(err, ValidatorError::Engine(_)));
        assert!(err.to_string().contains("unknown draft"));
    }
}
