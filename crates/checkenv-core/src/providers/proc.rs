//! Process environment provider
//!
//! Reads the environment of another running process from
//! `/proc/<pid>/environ`, a NUL-separated list of `NAME=VALUE` entries.
//! Only meaningful on Linux.

use super::env::split_assignment;
use super::traits::{ProviderError, ProviderResult, Variables, VariableProvider};
use std::path::PathBuf;

/// Provider for the environment of a process, selected by pid
#[derive(Debug)]
pub struct ProcessProvider {
    proc_root: PathBuf,
}

impl Default for ProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProvider {
    pub fn new() -> Self {
        Self::with_proc_root("/proc")
    }

    /// Use a different procfs mount point
    pub fn with_proc_root(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Parse raw `environ` content
    pub fn parse_environ(data: &[u8]) -> Variables {
        data.split(|b| *b == 0)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let entry = String::from_utf8_lossy(entry);
                let (name, value) = split_assignment(&entry);
                (name.to_string(), value.to_string())
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl VariableProvider for ProcessProvider {
    fn name(&self) -> &str {
        "proc"
    }

    fn help(&self) -> &str {
        "Provides the environment variables set for the process with the given pid, e.g. proc+1234"
    }

    async fn provide(&self, args: &str) -> ProviderResult<Variables> {
        let pid: u64 = args.trim().parse().map_err(|_| {
            ProviderError::ConfigurationError(format!("invalid process id: {:?}", args))
        })?;

        let path = self.proc_root.join(pid.to_string()).join("environ");
        let data = tokio::fs::read(&path).await?;
        Ok(Self::parse_environ(&data))
    }
}
