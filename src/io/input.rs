use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::domain::{FormSpec, parse_form_spec};

use super::DocumentFormat;

/// Parses structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).context("failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).context("failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .context("failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parses `contents` with `format` first, then every other compiled-in format.
fn parse_any(contents: &str, format: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, format) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    DocumentFormat::available_formats()
        .into_iter()
        .filter(|candidate| *candidate != format)
        .find_map(|candidate| parse_document_str(contents, candidate).ok())
        .ok_or(primary)
}

/// Reads a document from disk, choosing the format from the extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))?;
    let format = DocumentFormat::from_path(path).unwrap_or_default();
    parse_any(&contents, format).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses a form description document into a [`FormSpec`].
pub fn load_form_spec(contents: &str, format: DocumentFormat) -> Result<FormSpec> {
    let value = parse_any(contents, format)?;
    if !value.is_object() {
        return Err(anyhow!("form description must be an object with `groups`"));
    }
    parse_form_spec(&value)
}
