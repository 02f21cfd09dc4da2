//! # jsv-cli: Command-Line Validation
//!
//! Provides the `jsv` command-line interface over `jsv-schema`.
//!
//! ## Subcommands
//!
//! - `jsv validate`: validate JSON or YAML documents against a schema.
//! - `jsv overlay`: print the `errorMessage` overlay extracted from a schema.
//!
//! ```bash
//! jsv validate --schema schemas/user.schema.json users/*.json
//! cat user.json | jsv validate --schema schemas/user.schema.json --json
//! jsv overlay --schema schemas/user.schema.json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | every document is valid                             |
//! | 1    | at least one document failed validation             |
//! | 2    | operational failure (unreadable file, bad schema)   |

pub mod document;
pub mod overlay;
pub mod validate;

/// All documents valid.
pub const EXIT_VALID: u8 = 0;
/// At least one document invalid.
pub const EXIT_INVALID: u8 = 1;
/// The command could not run to completion.
pub const EXIT_FAILURE: u8 = 2;
