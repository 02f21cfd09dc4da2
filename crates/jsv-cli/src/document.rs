//! # Document Sources
//!
//! Reads the documents handed to `jsv validate`. JSON input is passed to
//! the validator as raw bytes so that malformed JSON is reported as a
//! validation failure. YAML input (`.yaml` / `.yml`) is converted to the
//! equivalent JSON value first; YAML that cannot be parsed or has no JSON
//! equivalent is likewise a failed result, not an error.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsv_schema::{ValidationResult, Validator};
use serde_json::Value;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Standard input, requested with `-` or by passing no documents.
    Stdin,
    /// A file on disk.
    File(PathBuf),
}

impl DocumentSource {
    /// Map a command-line argument to a source.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    fn is_yaml(&self) -> bool {
        match self {
            Self::Stdin => false,
            Self::File(path) => matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            ),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read `source` and validate it.
///
/// `stdin` is only read for [`DocumentSource::Stdin`].
pub fn validate_source(
    validator: &Validator,
    source: &DocumentSource,
    stdin: &mut dyn Read,
) -> Result<ValidationResult> {
    let bytes = match source {
        DocumentSource::Stdin => {
            let mut buf = Vec::new();
            stdin
                .read_to_end(&mut buf)
                .context("failed to read standard input")?;
            buf
        }
        DocumentSource::File(path) => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };

    let result = if source.is_yaml() && !is_blank(&bytes) {
        match yaml_document(&bytes) {
            Ok(value) => validator.validate_value(&value),
            Err(reason) => Ok(ValidationResult::unparseable("YAML", reason)),
        }
    } else {
        validator.validate_slice(&bytes)
    };
    result.with_context(|| format!("cannot validate {source}"))
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Parse YAML bytes into a JSON value.
fn yaml_document(bytes: &[u8]) -> Result<Value, String> {
    let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(|e| e.to_string())?;
    yaml_to_json_value(&yaml)
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped; scalar map keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
