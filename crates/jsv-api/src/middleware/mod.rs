//! # Middleware Modules
//!
//! Tower middleware for the validation service.

pub mod metrics;
pub mod schema_gate;
pub mod tracing_layer;

pub use schema_gate::{GateOutcome, MiddlewareConfig, SchemaGate};
