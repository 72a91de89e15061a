//! checkenv
//!
//! Inspect the environment variables defined by a set of providers.
//!
//! ## CLI Usage
//!
//! ```bash
//! # List the available providers
//! checkenv plugins
//!
//! # Everything a provider defines, plus selected variables from an env file
//! checkenv show env "file+.env://DATABASE_URL,PORT"
//!
//! # Dump tagged parameter-store values into an env file
//! checkenv extract --tags Product:test,Node:true --outfile prod.env --export
//! ```

pub mod cli;
pub mod error;

pub use cli::{CheckenvCli, Commands, ExitCode, ExtractOptions, OutputFormat};
pub use error::CliError;

use colored::Colorize;
use tracing::Level;

/// Log level for the given verbosity flags
///
/// `-q` wins over any number of `-v`.
pub fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
///
/// # Example
///
/// ```rust,no_run
/// use checkenv_cli::{run_cli, CheckenvCli};
/// use clap::Parser;
///
/// #[tokio::main]
/// async fn main() {
///     let cli = CheckenvCli::parse();
///     let exit_code = run_cli(cli).await;
///     std::process::exit(exit_code.into());
/// }
/// ```
pub async fn run_cli(cli: CheckenvCli) -> ExitCode {
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            e.exit_code()
        }
    }
}
