//! Resolution Engine
//!
//! Resolves every provider spec of a [`QuerySpec`] through the registry and
//! assembles a [`Report`]: full dumps for plain specs, selected variables for
//! `://` specs, with missing variables marked undefined.
//!
//! Specs are resolved one after another. Any unregistered provider or
//! provider failure aborts the whole resolution; nothing is reported
//! partially.

use crate::providers::{ProviderError, ProviderRegistry, Variables};
use crate::query::{ProviderSpec, QuerySpec};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use thiserror::Error;

/// Errors that abort a resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A spec names a provider that is not registered
    #[error("unregistered provider: {0}")]
    Unregistered(String),

    /// A provider could not be initialised
    #[error("provider {provider} failed to initialise: {source}")]
    Init {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// A provider failed to resolve a spec
    #[error("provider spec {spec} failed: {source}")]
    Provider {
        spec: String,
        #[source]
        source: ProviderError,
    },
}

/// Resolves provider specs against a registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a ProviderRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a single provider spec
    pub async fn resolve_spec(&self, spec: &str) -> Result<Variables, ResolveError> {
        let mut initialised = HashSet::new();
        self.resolve_with(spec, &mut initialised).await
    }

    /// Resolve every spec a query needs, keyed by the original spec string
    pub async fn resolve(&self, query: &QuerySpec) -> Result<BTreeMap<String, Variables>, ResolveError> {
        // Fail on unknown names before any provider is called
        for spec in query.load_from() {
            let name = ProviderSpec::parse(spec).name;
            if self.registry.lookup(name).is_none() {
                return Err(ResolveError::Unregistered(name.to_string()));
            }
        }

        let mut initialised = HashSet::new();
        let mut resolved = BTreeMap::new();
        for spec in query.load_from() {
            let vars = self.resolve_with(spec, &mut initialised).await?;
            resolved.insert(spec.clone(), vars);
        }

        Ok(resolved)
    }

    /// Resolve a query and arrange the result for display
    pub async fn report(&self, query: &QuerySpec) -> Result<Report, ResolveError> {
        let resolved = self.resolve(query).await?;
        Ok(Report::build(query, &resolved))
    }

    async fn resolve_with(
        &self,
        spec: &str,
        initialised: &mut HashSet<String>,
    ) -> Result<Variables, ResolveError> {
        let ProviderSpec { name, args } = ProviderSpec::parse(spec);
        let provider = self
            .registry
            .lookup(name)
            .ok_or_else(|| ResolveError::Unregistered(name.to_string()))?;

        if !initialised.contains(name) {
            provider.init().await.map_err(|source| ResolveError::Init {
                provider: name.to_string(),
                source,
            })?;
            initialised.insert(name.to_string());
        }

        tracing::debug!(spec = spec, provider = name, "Resolving provider spec");
        let vars = provider
            .provide(args)
            .await
            .map_err(|source| ResolveError::Provider {
                spec: spec.to_string(),
                source,
            })?;
        tracing::debug!(spec = spec, count = vars.len(), "Resolved provider spec");

        Ok(vars)
    }
}

/// Every variable of one provider spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullSection {
    pub spec: String,
    pub variables: BTreeMap<String, String>,
}

/// One requested variable; `value` is `None` when the provider lacks it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub name: String,
    pub value: Option<String>,
}

/// Requested variables of one provider spec, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificSection {
    pub spec: String,
    pub variables: Vec<Lookup>,
}

impl SpecificSection {
    /// Names requested but not defined by the provider
    pub fn undefined(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .filter(|l| l.value.is_none())
            .map(|l| l.name.as_str())
    }
}

/// Resolved variables arranged per the query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub full: Vec<FullSection>,
    pub specific: Vec<SpecificSection>,
}

impl Report {
    /// Arrange resolved variables according to a query
    pub fn build(query: &QuerySpec, resolved: &BTreeMap<String, Variables>) -> Self {
        let empty = Variables::new();

        let full = query
            .providers_full()
            .iter()
            .map(|spec| FullSection {
                spec: spec.clone(),
                variables: resolved
                    .get(spec)
                    .unwrap_or(&empty)
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect();

        let specific = query
            .provider_vars()
            .iter()
            .map(|(spec, names)| {
                let defined = resolved.get(spec).unwrap_or(&empty);
                SpecificSection {
                    spec: spec.clone(),
                    variables: names
                        .iter()
                        .map(|name| Lookup {
                            name: name.clone(),
                            value: defined.get(name).cloned(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self { full, specific }
    }

    /// Write the report as shell assignments
    ///
    /// With `export` set every assignment is prefixed with `export `.
    pub fn write_env<W: Write + ?Sized>(&self, out: &mut W, export: bool) -> io::Result<()> {
        let prefix = if export { "export " } else { "" };

        for section in &self.full {
            writeln!(out, "# Generated with {} - all variables:", section.spec)?;
            for (name, value) in &section.variables {
                writeln!(out, "{}{}={}", prefix, name, value)?;
            }
        }

        for section in &self.specific {
            writeln!(out, "# Generated with {} - specific variables:", section.spec)?;
            for lookup in &section.variables {
                match &lookup.value {
                    Some(value) => writeln!(out, "{}{}={}", prefix, lookup.name, value)?,
                    None => writeln!(out, "# UNDEFINED: {}", lookup.name)?,
                }
            }
        }

        Ok(())
    }
}
