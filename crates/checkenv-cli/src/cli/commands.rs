//! CLI command definitions for checkenv
//!
//! Provides Clap-based command definitions for listing providers, showing
//! resolved variables and dumping tagged parameter-store values.

use checkenv_core::providers::ssm::{fetch_parameters, generate_chunks, parse_filter_tags};
use checkenv_core::{ParameterStoreProvider, ProviderRegistry, QuerySpec, Resolver};
use clap::{Parser, Subcommand};
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::output::{self, OutputFormat};
use super::ExitCode;
use crate::error::CliError;

/// Message for a missing or empty `--tags`
pub const TAGS_REQUIRED: &str = "Please specify the tags for filter, at least Product tag";

/// Default page-size hint for `extract`
pub const DEFAULT_EXTRACT_MAX: i32 = 3;

/// checkenv CLI
///
/// Inspect the environment variables defined by a set of providers.
#[derive(Parser, Debug)]
#[command(name = "checkenv")]
#[command(about = "Inspect environment variables defined by providers", long_about = None)]
#[command(version)]
pub struct CheckenvCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available providers
    Plugins,

    /// Show variables defined by providers
    ///
    /// Each SPEC is `provider[+args]` to show every variable the provider
    /// defines, or `provider[+args]://VAR1,VAR2` to show only the listed ones.
    Show {
        /// Prefix every assignment with `export`
        #[arg(short, long)]
        export: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "env")]
        format: OutputFormat,

        /// Provider specs to resolve
        #[arg(required = true, value_name = "SPEC")]
        specs: Vec<String>,
    },

    /// Dump parameter-store values selected by tags
    Extract {
        /// Tag filters, e.g. Product:test,Node:true
        #[arg(short, long)]
        tags: Option<String>,

        /// Page-size hint for listing calls
        #[arg(short, long, default_value_t = DEFAULT_EXTRACT_MAX)]
        max: i32,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        outfile: Option<PathBuf>,

        /// Append to the output file instead of truncating it
        #[arg(short, long)]
        update: bool,

        /// Prefix every assignment with `export`
        #[arg(short, long)]
        export: bool,
    },
}

/// Options for [`execute_extract`]
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub tags: Option<String>,
    pub outfile: Option<PathBuf>,
    pub update: bool,
    pub export: bool,
}

/// Execute the plugins command
pub fn execute_plugins(registry: &ProviderRegistry, out: &mut dyn Write) -> Result<ExitCode, CliError> {
    writeln!(out, "Available plugins:")?;
    for provider in registry.list() {
        writeln!(out, "{}\n\t{}", provider.name(), provider.help())?;
    }
    out.flush()?;
    Ok(ExitCode::Success)
}

/// Execute the show command
pub async fn execute_show(
    registry: &ProviderRegistry,
    specs: &[String],
    format: OutputFormat,
    export: bool,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let query = QuerySpec::parse(specs);
    if query.is_empty() {
        return Err(CliError::usage("Please specify at least one provider spec"));
    }

    let report = Resolver::new(registry).report(&query).await?;
    output::render(&report, format, export, out)?;
    Ok(ExitCode::Success)
}

/// Execute the extract command
///
/// Values are written chunk by chunk. When `shutdown` completes the command
/// stops before the next chunk and returns [`ExitCode::Interrupted`]; lines
/// already written are kept.
pub async fn execute_extract<F>(
    provider: &ParameterStoreProvider,
    options: &ExtractOptions,
    stdout: &mut dyn Write,
    shutdown: F,
) -> Result<ExitCode, CliError>
where
    F: Future<Output = ()>,
{
    let tags = options.tags.as_deref().unwrap_or("").trim();
    if tags.is_empty() {
        return Err(CliError::usage(TAGS_REQUIRED));
    }
    let filters = parse_filter_tags(tags);
    if filters.is_empty() {
        return Err(CliError::usage(TAGS_REQUIRED));
    }

    let keys = provider
        .list_keys(&filters)
        .await
        .map_err(|e| CliError::provider("list parameter keys", e))?;
    if keys.is_empty() {
        return Err(CliError::NothingToGenerate);
    }

    let chunks = generate_chunks(&keys, provider.config().chunk_size);
    let store = provider
        .store()
        .await
        .map_err(|e| CliError::provider("connect to parameter store", e))?;

    let mut file: File;
    let out: &mut dyn Write = match &options.outfile {
        Some(path) => {
            file = open_output(path, options.update)?;
            &mut file
        }
        None => stdout,
    };

    let prefix = if options.export { "export " } else { "" };
    let mut written = 0usize;
    tokio::pin!(shutdown);

    for (index, chunk) in chunks.iter().enumerate() {
        let parameters = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::warn!(
                    written = written,
                    remaining_chunks = chunks.len() - index,
                    "Interrupted, stopping extraction"
                );
                out.flush()?;
                return Ok(ExitCode::Interrupted);
            }
            result = fetch_parameters(store.as_ref(), std::slice::from_ref(chunk)) => {
                result.map_err(|e| CliError::provider("fetch parameter values", e))?
            }
        };

        for parameter in parameters {
            writeln!(out, "{}{}={}", prefix, parameter.name, parameter.value)?;
            written += 1;
        }
        out.flush()?;
    }

    tracing::info!(count = written, "Extracted parameters");
    Ok(ExitCode::Success)
}

fn open_output(path: &Path, append: bool) -> Result<File, CliError> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    Ok(options.open(path)?)
}
