//! # Route Modules
//!
//! - [`schemas`]: registry listing and ad-hoc document validation.
//! - [`gate`]: one echo endpoint per registered schema, guarded by a
//!   [`SchemaGate`](crate::middleware::SchemaGate).

pub mod gate;
pub mod schemas;
