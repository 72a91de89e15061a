//! checkenv core
//!
//! Library behind the `checkenv` command: inspect the environment variables
//! defined by a set of providers.
//!
//! ## Features
//!
//! - **Provider Registry**: Named providers assembled once at startup
//! - **Query Specs**: `provider[+args]` and `provider[+args]://VAR1,VAR2` tokens
//! - **Resolution**: Sequential, fail-fast resolution into a displayable report
//! - **Parameter Store**: Tag-filtered, paginated and chunked SSM retrieval
//!
//! ## Architecture
//!
//! 1. **Providers** (`providers/`): The `VariableProvider` trait, the built-in
//!    providers and the registry that holds them.
//!
//! 2. **Query** (`query`): Parses positional tokens into the set of provider
//!    specs to resolve and the variables requested from each.
//!
//! 3. **Resolve** (`resolve`): Resolves a query against a registry and renders
//!    the result as shell assignments.
//!
//! ## Example
//!
//! ```rust,no_run
//! use checkenv_core::{default_registry, ParameterStoreConfig, QuerySpec, Resolver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = default_registry(ParameterStoreConfig::from_env()).unwrap();
//!     let query = QuerySpec::parse(["env://HOME,PATH"]);
//!
//!     let report = Resolver::new(&registry).report(&query).await.unwrap();
//!     report.write_env(&mut std::io::stdout(), false).unwrap();
//! }
//! ```

pub mod providers;
pub mod query;
pub mod resolve;

pub use providers::{
    default_registry, ParameterStoreConfig, ParameterStoreProvider, ProviderError,
    ProviderRegistry, ProviderResult, RegistryBuilder, RegistryError, VariableProvider, Variables,
};
pub use query::{ProviderSpec, QuerySpec};
pub use resolve::{FullSection, Lookup, Report, ResolveError, Resolver, SpecificSection};
