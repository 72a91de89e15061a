//! Output formatting for `checkenv show`
//!
//! The `env` format writes shell assignments that can be sourced directly.
//! JSON and YAML emit the same report as a structured document.

use checkenv_core::Report;
use clap::ValueEnum;
use std::io::Write;

use crate::error::CliError;

/// Output format options for `show`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Shell assignments with header comments
    #[default]
    Env,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Render a report in the given format
///
/// `export` only affects the `env` format.
pub fn render(
    report: &Report,
    format: OutputFormat,
    export: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Env => report.write_env(out, export)?,
        OutputFormat::Json => render_json(report, out)?,
        OutputFormat::Yaml => render_yaml(report, out)?,
    }
    out.flush()?;
    Ok(())
}

fn render_json(report: &Report, out: &mut dyn Write) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn render_yaml(report: &Report, out: &mut dyn Write) -> Result<(), CliError> {
    let yaml = serde_yaml::to_string(report)?;
    write!(out, "{}", yaml)?;
    Ok(())
}
