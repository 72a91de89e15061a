//! Environment Variable Providers
//!
//! Every source checkenv can read from is a provider: a named resolver that
//! turns a provider-specific argument string into a map of environment
//! variables.
//!
//! # Built-in Providers
//!
//! - **aws_ssm**: AWS Systems Manager Parameter Store, filtered by tags
//! - **env**: The checkenv process environment
//! - **file**: Env files on disk
//! - **kubesecret**: Kubernetes secrets
//! - **proc**: The environment of another process (Linux)
//!
//! # Architecture
//!
//! All providers implement the `VariableProvider` trait and are collected
//! into a `ProviderRegistry` at startup. Cloud SDK backends are only compiled
//! when the matching crate feature (`aws`, `kubernetes`) is enabled; without
//! it the provider stays listed and reports itself unavailable.

pub mod traits;
pub mod env;
pub mod kubesecret;
pub mod proc;
pub mod registry;
pub mod ssm;

// Re-export core types
pub use traits::{ProviderError, ProviderResult, VariableProvider, Variables};
pub use registry::{default_registry, ProviderRegistry, RegistryBuilder, RegistryError};

// Re-export provider implementations
pub use env::{EnvProvider, FileProvider};
pub use kubesecret::{KubeSecretArgs, KubeSecretProvider};
pub use proc::ProcessProvider;
pub use ssm::{ParameterStoreConfig, ParameterStoreProvider};
