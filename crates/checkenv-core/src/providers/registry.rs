//! Provider Registry
//!
//! Maps provider names to provider implementations. A registry is assembled
//! once at startup through [`RegistryBuilder`] and is read-only afterwards.
//! Registering two providers under the same name is a startup error.
//!
//! # Example
//!
//! ```rust,ignore
//! use checkenv_core::providers::{EnvProvider, FileProvider, ProviderRegistry};
//!
//! let registry = ProviderRegistry::builder()
//!     .register(EnvProvider::new())?
//!     .register(FileProvider::new())?
//!     .build();
//!
//! let env = registry.lookup("env").expect("registered");
//! ```

use super::env::{EnvProvider, FileProvider};
use super::kubesecret::KubeSecretProvider;
use super::proc::ProcessProvider;
use super::ssm::{ParameterStoreConfig, ParameterStoreProvider};
use super::traits::VariableProvider;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling a registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A plugin already exists with name: {0}")]
    Duplicate(String),
}

/// Read-only set of named providers
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn VariableProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl ProviderRegistry {
    /// Start assembling a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Find the provider registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn VariableProvider>> {
        self.providers.get(name)
    }

    /// All registered providers, ordered by name
    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn VariableProvider>> {
        self.providers.values()
    }

    /// Registered provider names in order
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Builder for [`ProviderRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    registry: ProviderRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name
    pub fn register<P: VariableProvider + 'static>(self, provider: P) -> Result<Self, RegistryError> {
        self.register_arc(Arc::new(provider))
    }

    /// Register a pre-wrapped provider
    pub fn register_arc(mut self, provider: Arc<dyn VariableProvider>) -> Result<Self, RegistryError> {
        let name = provider.name().to_string();
        if self.registry.providers.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::trace!(provider = %name, "Registered provider");
        self.registry.providers.insert(name, provider);
        Ok(self)
    }

    pub fn build(self) -> ProviderRegistry {
        self.registry
    }
}

/// Registry with every built-in provider
pub fn default_registry(ssm: ParameterStoreConfig) -> Result<ProviderRegistry, RegistryError> {
    Ok(RegistryBuilder::new()
        .register(ParameterStoreProvider::new(ssm))?
        .register(EnvProvider::new())?
        .register(FileProvider::new())?
        .register(KubeSecretProvider::new())?
        .register(ProcessProvider::new())?
        .build())
}
