//! CLI module for checkenv
//!
//! Command definitions, exit codes and the dispatcher that wires the built-in
//! providers to the commands.

pub mod commands;
pub mod output;

pub use commands::{CheckenvCli, Commands, ExtractOptions};
pub use output::OutputFormat;

use checkenv_core::{default_registry, ParameterStoreConfig, ParameterStoreProvider};
use std::io;

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// A provider failed while resolving
    ProviderError = 1,
    /// Invalid arguments
    Usage = 2,
    /// A provider is unavailable or misconfigured
    ConfigurationError = 3,
    /// Internal error
    InternalError = 10,
    /// Stopped by Ctrl-C
    Interrupted = 130,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Run the CLI with the given arguments and return the exit code
pub async fn run(cli: CheckenvCli) -> Result<ExitCode, CliError> {
    let config = ParameterStoreConfig::from_env();
    let mut stdout = io::stdout();

    match cli.command {
        Commands::Plugins => {
            let registry = default_registry(config)?;
            commands::execute_plugins(&registry, &mut stdout)
        }
        Commands::Show {
            export,
            format,
            specs,
        } => {
            let registry = default_registry(config)?;
            commands::execute_show(&registry, &specs, format, export, &mut stdout).await
        }
        Commands::Extract {
            tags,
            max,
            outfile,
            update,
            export,
        } => {
            let provider = ParameterStoreProvider::new(config.with_page_size(max));
            let options = ExtractOptions {
                tags,
                outfile,
                update,
                export,
            };
            commands::execute_extract(&provider, &options, &mut stdout, shutdown_signal()).await
        }
    }
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
