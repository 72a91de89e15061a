//! Query specs
//!
//! A `show` invocation names providers with positional tokens:
//!
//! - `provider[+args]` asks for every variable the provider defines
//! - `provider[+args]://VAR1,VAR2` asks only for the listed variables
//!
//! Both forms may be used for the same provider spec in one invocation.

use std::collections::{BTreeMap, BTreeSet};

/// Separates a provider spec from its variable list
pub const VARIABLE_SEPARATOR: &str = "://";

/// Separates a provider name from its arguments
pub const ARGUMENT_SEPARATOR: char = '+';

/// A provider reference of the form `name[+args]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec<'a> {
    pub name: &'a str,
    pub args: &'a str,
}

impl<'a> ProviderSpec<'a> {
    /// Split on the first `+`; without one the arguments are empty
    pub fn parse(spec: &'a str) -> Self {
        let (name, args) = spec.split_once(ARGUMENT_SEPARATOR).unwrap_or((spec, ""));
        Self { name, args }
    }
}

/// Parsed set of provider specs requested on a command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    load_from: BTreeSet<String>,
    providers_full: BTreeSet<String>,
    provider_vars: BTreeMap<String, Vec<String>>,
}

impl QuerySpec {
    /// Parse positional tokens
    ///
    /// Empty names in a variable list are skipped, and a name requested
    /// twice for the same spec is kept once at its first position.
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut query = Self::default();

        for token in tokens {
            let token = token.as_ref();
            match token.split_once(VARIABLE_SEPARATOR) {
                None => {
                    query.load_from.insert(token.to_string());
                    query.providers_full.insert(token.to_string());
                }
                Some((spec, var_list)) => {
                    query.load_from.insert(spec.to_string());
                    let vars = query.provider_vars.entry(spec.to_string()).or_default();
                    for name in var_list.split(',').filter(|n| !n.is_empty()) {
                        if !vars.iter().any(|v| v == name) {
                            vars.push(name.to_string());
                        }
                    }
                }
            }
        }

        query
    }

    /// Every distinct provider spec that has to be resolved
    pub fn load_from(&self) -> &BTreeSet<String> {
        &self.load_from
    }

    /// Provider specs whose variables are all reported
    pub fn providers_full(&self) -> &BTreeSet<String> {
        &self.providers_full
    }

    /// Provider specs mapped to the variable names requested from them
    pub fn provider_vars(&self) -> &BTreeMap<String, Vec<String>> {
        &self.provider_vars
    }

    pub fn is_empty(&self) -> bool {
        self.load_from.is_empty()
    }
}
