//! Core traits for environment variable providers
//!
//! This module defines the contract every provider implements: a name,
//! a help string describing its argument syntax, an optional initializer
//! and the function that turns a provider-specific argument string into
//! a set of environment variables.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Environment variables resolved by a provider, keyed by variable name
pub type Variables = HashMap<String, String>;

/// Errors that can occur when interacting with variable providers
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider is not available in this build or environment
    #[error("Provider not available: {0}")]
    Unavailable(String),

    /// Provider arguments or settings are invalid
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A call to a remote service failed
    #[error("Remote call {operation} failed: {message}")]
    RemoteCall {
        operation: &'static str,
        message: String,
    },

    /// A paginated listing did not terminate within the iteration cap
    #[error("Too many iterations over {operation} loop (limit {limit}), check the filter")]
    PaginationLimit {
        operation: &'static str,
        limit: usize,
    },

    /// I/O error (for file-based providers)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed data read from a source
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Create a remote call error for the given operation
    pub fn remote(operation: &'static str, message: impl fmt::Display) -> Self {
        ProviderError::RemoteCall {
            operation,
            message: message.to_string(),
        }
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Core trait for variable providers
///
/// A provider resolves a set of environment variables from one kind of
/// external source. The argument string passed to [`provide`] is opaque to
/// everything except the provider itself; its grammar is documented through
/// [`help`].
///
/// [`provide`]: VariableProvider::provide
/// [`help`]: VariableProvider::help
#[async_trait::async_trait]
pub trait VariableProvider: Send + Sync + fmt::Debug {
    /// Returns the unique name this provider is registered under
    fn name(&self) -> &str;

    /// Help text explaining what the provider reads and its argument syntax
    fn help(&self) -> &str;

    /// Prepare the provider before its first use
    ///
    /// Default implementation does nothing.
    async fn init(&self) -> ProviderResult<()> {
        Ok(())
    }

    /// Resolve variables for the given provider arguments
    async fn provide(&self, args: &str) -> ProviderResult<Variables>;
}
