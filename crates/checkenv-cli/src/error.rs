//! Error types for the checkenv CLI

use checkenv_core::{ProviderError, RegistryError, ResolveError};
use thiserror::Error;

use crate::cli::ExitCode;

/// Main error type for CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments
    #[error("{0}")]
    Usage(String),

    /// Built-in providers could not be registered
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A `show` resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A parameter-store step of `extract` failed
    #[error("{stage} failed: {source}")]
    Provider {
        stage: &'static str,
        #[source]
        source: ProviderError,
    },

    /// No parameter matched the requested tags
    #[error("Nothing to generate, empty slice provided")]
    NothingToGenerate,

    /// Serialization of structured output failed
    #[error("Output error: {0}")]
    Output(String),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        CliError::Usage(msg.into())
    }

    /// Tag a provider error with the step that raised it
    pub fn provider(stage: &'static str, source: ProviderError) -> Self {
        CliError::Provider { stage, source }
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::Usage(_) | CliError::Resolve(ResolveError::Unregistered(_)) | CliError::Io(_)
        )
    }

    /// Exit code reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Usage(_) | CliError::Resolve(ResolveError::Unregistered(_)) => ExitCode::Usage,
            CliError::Resolve(ResolveError::Init { source, .. })
            | CliError::Resolve(ResolveError::Provider { source, .. })
            | CliError::Provider { source, .. } => provider_exit_code(source),
            CliError::NothingToGenerate => ExitCode::ProviderError,
            CliError::Io(_) => ExitCode::ConfigurationError,
            CliError::Registry(_) | CliError::Output(_) => ExitCode::InternalError,
        }
    }
}

fn provider_exit_code(err: &ProviderError) -> ExitCode {
    match err {
        ProviderError::Unavailable(_) | ProviderError::ConfigurationError(_) => {
            ExitCode::ConfigurationError
        }
        _ => ExitCode::ProviderError,
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Output(format!("YAML error: {}", err))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
