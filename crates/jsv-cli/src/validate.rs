//! # Validate Subcommand
//!
//! `jsv validate --schema <PATH> [DOC...]` validates each document and
//! prints one report per document, either human-readable or (with
//! `--json`) as one JSON object per line.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jsv_schema::{ValidationResult, Validator};
use serde::Serialize;

use crate::document::{validate_source, DocumentSource};
use crate::{EXIT_INVALID, EXIT_VALID};

/// Arguments for the `jsv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON).
    #[arg(long, short, value_name = "PATH")]
    pub schema: PathBuf,

    /// Documents to validate; `-` or no documents reads standard input.
    /// Files ending in `.yaml` or `.yml` are parsed as YAML.
    #[arg(value_name = "DOC")]
    pub documents: Vec<PathBuf>,

    /// Print full results as JSON lines.
    #[arg(long)]
    pub json: bool,
}

/// One line of `--json` output.
#[derive(Serialize)]
struct DocumentReport<'a> {
    document: String,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

/// Execute the validate subcommand against the process's stdin and stdout.
///
/// Returns exit code: 0 when every document is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    validate_documents(args, &mut stdin.lock(), &mut stdout.lock())
}

/// Validate every document named in `args`, writing reports to `out`.
pub fn validate_documents(
    args: &ValidateArgs,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<u8> {
    let validator = Validator::from_path(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    tracing::info!(
        schema = %args.schema.display(),
        overlay_fields = validator.overlay().len(),
        "loaded schema"
    );

    let sources: Vec<DocumentSource> = if args.documents.is_empty() {
        vec![DocumentSource::Stdin]
    } else {
        args.documents.iter().map(|d| DocumentSource::from_arg(d)).collect()
    };

    let mut invalid = 0usize;
    for source in &sources {
        let result = validate_source(&validator, source, stdin)?;
        tracing::debug!(document = %source, valid = result.is_valid(), "validated document");
        if !result.is_valid() {
            invalid += 1;
        }
        if args.json {
            let report = DocumentReport {
                document: source.to_string(),
                result: &result,
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            write_human(out, source, &result)?;
        }
    }

    if !args.json && sources.len() > 1 {
        writeln!(
            out,
            "\n{}/{} document(s) passed",
            sources.len() - invalid,
            sources.len()
        )?;
    }

    Ok(if invalid == 0 { EXIT_VALID } else { EXIT_INVALID })
}

fn write_human(out: &mut dyn Write, source: &DocumentSource, result: &ValidationResult) -> Result<()> {
    if result.is_valid() {
        writeln!(out, "OK    {source}")?;
        return Ok(());
    }
    writeln!(out, "FAIL  {source}")?;
    for d in result.errors() {
        let field = if d.field.is_empty() { "(root)" } else { d.field.as_str() };
        if d.constraint.is_empty() {
            writeln!(out, "  {field}: {}", d.message)?;
        } else {
            writeln!(out, "  {field}: {} [{}]", d.message, d.constraint)?;
        }
    }
    Ok(())
}
