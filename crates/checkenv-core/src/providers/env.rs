//! Environment Variable Providers
//!
//! This module provides adapters for loading variables from:
//! - The checkenv process's own environment (`env`)
//! - Env files on disk (`file+<path>`)
//!
//! # File Format
//!
//! ```text
//! # Comment
//! KEY=value
//! export OTHER="quoted value"
//! EMPTY
//! ```

use super::traits::{ProviderResult, Variables, VariableProvider};
use std::path::Path;

/// Split a `NAME=VALUE` assignment on its first `=`
///
/// A line without `=` defines the name with an empty value.
pub fn split_assignment(line: &str) -> (&str, &str) {
    line.split_once('=').unwrap_or((line, ""))
}

/// Provider for the current process environment
#[derive(Debug, Default)]
pub struct EnvProvider;

impl EnvProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl VariableProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn help(&self) -> &str {
        "Provides the environment variables defined in the checkenv process."
    }

    async fn provide(&self, _args: &str) -> ProviderResult<Variables> {
        Ok(std::env::vars_os()
            .map(|(name, value)| {
                (
                    name.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect())
    }
}

/// Provider for env files
///
/// The provider argument is the path of the file to read.
#[derive(Debug, Default)]
pub struct FileProvider;

impl FileProvider {
    pub fn new() -> Self {
        Self
    }

    /// Parse env file content into variables
    pub fn parse(content: &str) -> Variables {
        let mut vars = Variables::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
            let (name, value) = split_assignment(line);
            vars.insert(name.trim().to_string(), unquote(value.trim()).to_string());
        }

        vars
    }

    async fn read(path: &Path) -> ProviderResult<Variables> {
        let content = tokio::fs::read_to_string(path).await?;
        let vars = Self::parse(&content);
        tracing::debug!(path = %path.display(), count = vars.len(), "Loaded env file");
        Ok(vars)
    }
}

/// Remove one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[async_trait::async_trait]
impl VariableProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn help(&self) -> &str {
        "Provides the environment variables defined in the env file with the given path, e.g. file+.env"
    }

    async fn provide(&self, args: &str) -> ProviderResult<Variables> {
        Self::read(Path::new(args)).await
    }
}
