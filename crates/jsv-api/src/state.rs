//! # Application State
//!
//! Shared state for the Axum application and the environment-driven
//! configuration of the `jsv-api` binary.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use jsv_schema::ValidatorRegistry;
use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;

use crate::middleware::schema_gate::{
    MiddlewareConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_SKIP_METHODS,
};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Schema directory used when `JSV_SCHEMA_DIR` is unset.
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Invalid environment configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `PORT` is not a number in `0..=65535`.
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    /// An entry of `JSV_SKIP_METHODS` is not a valid method token.
    #[error("JSV_SKIP_METHODS contains an invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// `JSV_MAX_BODY_BYTES` is not a byte count.
    #[error("JSV_MAX_BODY_BYTES must be a byte count, got {0:?}")]
    InvalidBodyLimit(String),
}

/// Value of environment variable `key`, or `default` when it is not set.
/// A variable set to the empty string is returned as is.
pub fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Binary configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory scanned for `*.schema.json` files at startup.
    pub schema_dir: PathBuf,
    /// Methods the gate lets through unvalidated.
    pub skip_methods: Vec<Method>,
    /// Largest request body the gate buffers.
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
            skip_methods: DEFAULT_SKIP_METHODS.to_vec(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `JSV_SCHEMA_DIR`, `JSV_SKIP_METHODS` and
    /// `JSV_MAX_BODY_BYTES`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if a variable is set to something unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = parse_port(&env_or_default("PORT", &defaults.port.to_string()))?;
        let schema_dir = PathBuf::from(env_or_default("JSV_SCHEMA_DIR", DEFAULT_SCHEMA_DIR));
        let skip_methods = match std::env::var("JSV_SKIP_METHODS") {
            Ok(list) => parse_methods(&list)?,
            Err(_) => defaults.skip_methods,
        };
        let max_body_bytes = parse_body_limit(&env_or_default(
            "JSV_MAX_BODY_BYTES",
            &defaults.max_body_bytes.to_string(),
        ))?;
        Ok(Self {
            port,
            schema_dir,
            skip_methods,
            max_body_bytes,
        })
    }

    /// Gate configuration derived from this config.
    pub fn gate_config(&self) -> MiddlewareConfig {
        MiddlewareConfig::default()
            .with_skip_methods(self.skip_methods.iter().cloned())
            .with_max_body_bytes(self.max_body_bytes)
    }
}

/// Parse a TCP port.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

/// Parse a body size limit in bytes.
pub fn parse_body_limit(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBodyLimit(raw.to_string()))
}

/// Parse a comma-separated method list. Blank entries are ignored, so an
/// empty string yields an empty list.
pub fn parse_methods(raw: &str) -> Result<Vec<Method>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| {
            Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| ConfigError::InvalidMethod(m.to_string()))
        })
        .collect()
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validators served under `/v1/schemas/{key}` and `/v1/gate/{key}`.
    pub registry: Arc<ValidatorRegistry>,
    /// Configuration shared by every mounted gate.
    pub gate_config: Arc<MiddlewareConfig>,
    /// Prometheus handle; `/metrics` is mounted only when present.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State over `registry` with the default gate configuration.
    pub fn new(registry: impl Into<Arc<ValidatorRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            gate_config: Arc::new(MiddlewareConfig::default()),
            metrics: None,
        }
    }

    /// Replace the gate configuration.
    pub fn with_gate_config(mut self, config: MiddlewareConfig) -> Self {
        self.gate_config = Arc::new(config);
        self
    }

    /// Serve metrics from `handle`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("schemas", &self.registry.len())
            .field("gate_config", &self.gate_config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
