//! # Validator Registry
//!
//! Named collection of validators for services with several endpoints or
//! schemas. Keys are arbitrary strings; adding under an existing key
//! replaces the previous validator.
//!
//! The map sits behind a `parking_lot::RwLock`, so a shared registry can be
//! read and mutated from several threads. The lock is never held while a
//! validator runs: lookups hand out an `Arc<Validator>`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ValidatorError;
use crate::validator::Validator;

/// Filename suffix picked up by [`ValidatorRegistry::load_dir`].
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.json";

/// Thread-safe mapping from key to [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: RwLock<HashMap<String, Arc<Validator>>>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator, replacing any previous entry for `key`.
    pub fn add(&self, key: impl Into<String>, validator: impl Into<Arc<Validator>>) {
        let key = key.into();
        let replaced = self
            .validators
            .write()
            .insert(key.clone(), validator.into())
            .is_some();
        tracing::debug!(key = %key, replaced, "registered validator");
    }

    /// Build a validator from a schema file and register it.
    ///
    /// # Errors
    ///
    /// Propagates [`Validator::from_path`] failures; the registry is
    /// unchanged on error.
    pub fn add_from_path(
        &self,
        key: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), ValidatorError> {
        let validator = Validator::from_path(path)?;
        self.add(key, validator);
        Ok(())
    }

    /// Build a validator from a schema string and register it.
    ///
    /// # Errors
    ///
    /// Propagates [`Validator::from_json_str`] failures; the registry is
    /// unchanged on error.
    pub fn add_from_json_str(
        &self,
        key: impl Into<String>,
        schema: &str,
    ) -> Result<(), ValidatorError> {
        let validator = Validator::from_json_str(schema)?;
        self.add(key, validator);
        Ok(())
    }

    /// Register every `*.schema.json` file in `dir` under its stem
    /// (`user.schema.json` → `user`). Returns how many were registered.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Io`] if the directory cannot be listed; the first
    /// schema that fails to load aborts the scan.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, ValidatorError> {
        let dir = dir.as_ref();
        let io_err = |source: std::io::Error| ValidatorError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let key = match path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(SCHEMA_FILE_SUFFIX))
            {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => continue,
            };
            self.add_from_path(key, &path)?;
            loaded += 1;
        }

        tracing::debug!(dir = %dir.display(), loaded, "loaded schema directory");
        Ok(loaded)
    }

    /// Look up a validator by key.
    pub fn get(&self, key: &str) -> Option<Arc<Validator>> {
        self.validators.read().get(key).cloned()
    }

    /// Remove a validator. No-op if the key is absent.
    pub fn remove(&self, key: &str) {
        if self.validators.write().remove(key).is_some() {
            tracing::debug!(key = %key, "removed validator");
        }
    }

    /// All registered keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.validators.read().keys().cloned().collect()
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.read().is_empty()
    }
}
