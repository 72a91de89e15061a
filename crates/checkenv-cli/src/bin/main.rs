//! checkenv CLI
//!
//! # Usage
//!
//! ```bash
//! checkenv plugins
//! checkenv show [--export] [--format env|json|yaml] SPEC...
//! checkenv extract --tags Product:test [--max 3] [--outfile FILE] [--update] [--export]
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: A provider failed
//! - 2: Invalid arguments or unregistered provider
//! - 3: Provider unavailable or misconfigured
//! - 10: Internal error
//! - 130: Interrupted

use checkenv_cli::{log_level, run_cli, CheckenvCli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = CheckenvCli::parse();

    // Logs go to stderr so stdout can be sourced
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level(cli.verbose, cli.quiet).into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}
