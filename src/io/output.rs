use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::DocumentFormat;

/// Where submitted values are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

/// Serialization settings for the submitted values.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serializes `value` in the configured format.
pub fn render_value(value: &Value, options: &OutputOptions) -> Result<String> {
    let rendered = match options.format {
        DocumentFormat::Json if options.pretty => serde_json::to_string_pretty(value),
        DocumentFormat::Json => serde_json::to_string(value),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            return serde_yaml::to_string(value).context("failed to serialize YAML");
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let rendered = if options.pretty {
                toml::to_string_pretty(value)
            } else {
                toml::to_string(value)
            };
            return rendered.context("failed to serialize TOML");
        }
    };
    rendered.context("failed to serialize JSON")
}

/// Writes `value` to every configured destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = render_value(value, options)?;
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}")
                    .and_then(|_| stdout.flush())
                    .context("failed to write to stdout")?;
            }
            OutputDestination::File(path) => {
                fs::write(path, format!("{payload}\n"))
                    .with_context(|| format!("failed to write to file {}", path.display()))?;
            }
        }
        debug!(?destination, format = %options.format, "values written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn no_destinations_is_a_noop() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"ok": true}), &options).unwrap();
    }

    #[test]
    fn compact_json_has_no_newlines() {
        let options = OutputOptions::default().with_pretty(false);
        let rendered = render_value(&json!({"a": 1, "b": [true]}), &options).unwrap();
        assert_eq!(rendered, r#"{"a":1,"b":[true]}"#);
    }

    #[test]
    fn writes_file_destination() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("gridform-output-{nanos}.json"));
        let options =
            OutputOptions::default().with_destinations(vec![OutputDestination::file(&path)]);
        emit(&json!({"email": "ada@example.com"}), &options).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"email\": \"ada@example.com\""));
        let _ = fs::remove_file(path);
    }
}
