//! # Overlay Subcommand
//!
//! `jsv overlay --schema <PATH>` prints the `errorMessage` overlay table a
//! validator would use, as pretty JSON keyed by field then constraint.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jsv_schema::Validator;

use crate::EXIT_VALID;

/// Arguments for the `jsv overlay` subcommand.
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Schema file (JSON).
    #[arg(long, short, value_name = "PATH")]
    pub schema: PathBuf,
}

/// Execute the overlay subcommand against stdout.
pub fn run_overlay(args: &OverlayArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    print_overlay(args, &mut stdout.lock())
}

/// Write the overlay table for `args.schema` to `out`.
pub fn print_overlay(args: &OverlayArgs, out: &mut dyn Write) -> Result<u8> {
    let validator = Validator::from_path(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    let overlay = validator.overlay();
    tracing::debug!(fields = overlay.len(), "extracted overlay");

    serde_json::to_writer_pretty(&mut *out, overlay)?;
    writeln!(out)?;
    Ok(EXIT_VALID)
}
