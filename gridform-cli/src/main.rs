use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridform::{
    DocumentFormat, GridForm, OutputDestination, OutputOptions, UiOptions, load_form_spec,
    parse_document_str,
};

const LOG_ENV: &str = "GRIDFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "gridform",
    version,
    about = "gridform: render declarative form descriptions as interactive terminal forms"
)]
struct Cli {
    /// Form description: file path or "-" for stdin
    #[arg(long = "form", value_name = "SPEC")]
    form: String,

    /// Initial values: file path or "-" for stdin
    #[arg(long = "values", alias = "defaults", value_name = "SPEC")]
    values: Option<String>,

    /// Title drawn on the form container
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Quit without asking even when there are unsubmitted changes
    #[arg(long = "no-confirm")]
    no_confirm: bool,

    /// Keep the form open after a successful submit
    #[arg(long = "keep-open")]
    keep_open: bool,

    /// Write diagnostics to this file; verbosity follows GRIDFORM_LOG (default "warn")
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    if cli.form == "-" && cli.values.as_deref() == Some("-") {
        return Err(eyre!(
            "cannot read both the form description and the values from stdin"
        ));
    }

    let form_format = format_hint(&cli.form);
    let contents = read_source(&cli.form).wrap_err("failed to read form description")?;
    let spec = load_form_spec(&contents, form_format)
        .map_err(Report::msg)
        .wrap_err_with(|| format!("failed to load form description from {}", cli.form))?;

    let values = match cli.values.as_deref() {
        Some(source) => Some(load_values(source)?),
        None => None,
    };

    let output = build_output_options(&cli, form_format)?;
    let options = UiOptions::default()
        .with_confirm_exit(!cli.no_confirm)
        .with_exit_on_submit(!cli.keep_open);

    let mut form = GridForm::new(spec).with_options(options).with_output(output);
    if let Some(title) = cli.title {
        form = form.with_title(title);
    }
    if let Some(values) = values {
        form = form.with_defaults(values);
    }

    match form.run().map_err(Report::msg)? {
        Some(_) => {
            info!("values emitted");
            Ok(())
        }
        None => Err(eyre!("form closed without submitting")),
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // without a log file nothing may reach the terminal the form draws on
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(log = %path.display(), "logging initialised");
    Ok(())
}

fn format_hint(source: &str) -> DocumentFormat {
    if source == "-" {
        return DocumentFormat::default();
    }
    DocumentFormat::from_path(Path::new(source)).unwrap_or_default()
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(source).wrap_err_with(|| format!("failed to read file {source}"))
}

fn load_values(source: &str) -> Result<Value> {
    let contents = read_source(source).wrap_err("failed to read initial values")?;
    let value = parse_document_str(&contents, format_hint(source))
        .map_err(Report::msg)
        .wrap_err_with(|| format!("failed to parse initial values from {source}"))?;
    if !value.is_object() {
        return Err(eyre!("initial values must be an object keyed by field name"));
    }
    Ok(value)
}

fn build_output_options(cli: &Cli, input_format: DocumentFormat) -> Result<OutputOptions> {
    let mut destinations = Vec::new();
    let mut detected: Option<DocumentFormat> = None;
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            return Err(eyre!("output destination cannot be empty"));
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(raw);
        let format = DocumentFormat::from_path(&path).ok_or_else(|| {
            eyre!(
                "cannot infer format from output file {}; use one of: {}",
                path.display(),
                format_list()
            )
        })?;
        match detected {
            Some(existing) if existing != format => {
                return Err(eyre!(
                    "output file {} uses {format} but other destinations use {existing}",
                    path.display()
                ));
            }
            _ => detected = Some(format),
        }
        if !cli.force && path.exists() {
            return Err(eyre!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
        destinations.push(OutputDestination::File(path));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    Ok(OutputOptions::new(detected.unwrap_or(input_format))
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations))
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format!(".{format}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gridform", "--form", "form.json"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn defaults_to_stdout() {
        let options = build_output_options(&cli(&[]), DocumentFormat::Json).unwrap();
        assert_eq!(options.destinations, vec![OutputDestination::Stdout]);
        assert!(options.pretty);
    }

    #[test]
    fn output_format_follows_file_extension() {
        let target = std::env::temp_dir().join("gridform-cli-never-created.json");
        let raw = target.display().to_string();
        let options = build_output_options(&cli(&["-o", &raw, "--no-pretty"]), DocumentFormat::Json)
            .unwrap();
        assert_eq!(options.format, DocumentFormat::Json);
        assert!(!options.pretty);
        assert_eq!(options.destinations, vec![OutputDestination::File(target)]);
    }

    #[test]
    fn unknown_output_extension_is_rejected() {
        let err = build_output_options(&cli(&["-o", "values.txt"]), DocumentFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("cannot infer format"));
    }

    #[test]
    fn stdin_uses_default_format() {
        assert_eq!(format_hint("-"), DocumentFormat::Json);
        assert_eq!(format_hint("form.json"), DocumentFormat::Json);
    }
}
