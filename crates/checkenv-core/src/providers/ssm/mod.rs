//! AWS Systems Manager Parameter Store provider
//!
//! Resolves variables from parameters selected by resource tags. A
//! resolution runs in four steps:
//!
//! 1. parse the provider arguments as `TagName:TagValue,...` filters
//! 2. list all matching parameter keys, page by page
//! 3. split the keys into chunks of at most [`MAX_FETCH_BATCH`]
//! 4. fetch the values one chunk per call
//!
//! # Configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `CHECKENV_SSM_MAX_ITERATIONS` | listing calls allowed per resolution | 10 |
//! | `CHECKENV_SSM_PAGE_SIZE` | page-size hint (1..=50) | service default |
//!
//! # Example
//!
//! ```text
//! checkenv show "aws_ssm+Product:test,Node:true"
//! ```

pub mod filter;
pub mod pagination;
pub mod store;

#[cfg(feature = "aws")]
mod aws;

#[cfg(feature = "aws")]
pub use aws::AwsParameterStore;
pub use filter::{parse_filter_tags, FilterTag};
pub use pagination::{
    fetch_parameters, generate_chunks, list_parameter_keys, DEFAULT_MAX_ITERATIONS,
    MAX_FETCH_BATCH,
};
pub use store::{ListPage, ListRequest, Parameter, ParameterStore};

use super::traits::{ProviderError, ProviderResult, Variables, VariableProvider};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Environment variable overriding the pagination iteration cap
pub const MAX_ITERATIONS_ENV: &str = "CHECKENV_SSM_MAX_ITERATIONS";

/// Environment variable setting the listing page-size hint
pub const PAGE_SIZE_ENV: &str = "CHECKENV_SSM_PAGE_SIZE";

/// Largest page size the listing endpoint accepts
pub const MAX_PAGE_SIZE: i32 = 50;

const HELP: &str = "Provides environment variables defined in AWS Systems Manager Parameter Store. \
     Arguments: comma-separated tag filters, e.g. aws_ssm+Product:test,Node:true";

/// Settings for parameter-store resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStoreConfig {
    /// Upper bound on listing calls
    pub max_iterations: usize,
    /// Page-size hint for listing calls
    pub page_size: Option<i32>,
    /// Names per value fetch, never above [`MAX_FETCH_BATCH`]
    pub chunk_size: usize,
}

impl Default for ParameterStoreConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            page_size: None,
            chunk_size: MAX_FETCH_BATCH,
        }
    }
}

impl ParameterStoreConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable or out-of-range values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_ITERATIONS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_iterations = n,
                _ => tracing::warn!(
                    variable = MAX_ITERATIONS_ENV,
                    value = %raw,
                    "Ignoring invalid iteration cap"
                ),
            }
        }

        if let Some(raw) = lookup(PAGE_SIZE_ENV) {
            match raw.trim().parse::<i32>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => config.page_size = Some(n),
                _ => tracing::warn!(
                    variable = PAGE_SIZE_ENV,
                    value = %raw,
                    "Ignoring invalid page size"
                ),
            }
        }

        config
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Set the page-size hint, clamped to what the service accepts
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size.clamp(1, MAX_PAGE_SIZE));
        self
    }

    /// Set the fetch chunk size, clamped to 1..=[`MAX_FETCH_BATCH`]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_FETCH_BATCH);
        self
    }
}

/// Provider backed by a [`ParameterStore`]
///
/// Without an explicit store the real AWS backend is loaded on first use,
/// which requires the `aws` feature.
pub struct ParameterStoreProvider {
    config: ParameterStoreConfig,
    store: OnceCell<Arc<dyn ParameterStore>>,
}

impl std::fmt::Debug for ParameterStoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStoreProvider")
            .field("config", &self.config)
            .field("store_ready", &self.store.initialized())
            .finish()
    }
}

impl ParameterStoreProvider {
    /// Create a provider that connects to AWS on first use
    pub fn new(config: ParameterStoreConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    /// Create a provider over an explicit store
    pub fn with_store(config: ParameterStoreConfig, store: Arc<dyn ParameterStore>) -> Self {
        Self {
            config,
            store: OnceCell::new_with(Some(store)),
        }
    }

    pub fn config(&self) -> &ParameterStoreConfig {
        &self.config
    }

    /// The backing store, connecting to it if needed
    pub async fn store(&self) -> ProviderResult<Arc<dyn ParameterStore>> {
        self.store
            .get_or_try_init(connect_default_store)
            .await
            .cloned()
    }

    /// List all keys matching `filters` under this provider's settings
    pub async fn list_keys(&self, filters: &[FilterTag]) -> ProviderResult<Vec<String>> {
        let store = self.store().await?;
        list_parameter_keys(
            store.as_ref(),
            filters,
            self.config.page_size,
            self.config.max_iterations,
        )
        .await
    }

    /// Full resolution: list, chunk and fetch
    pub async fn fetch_all(&self, filters: &[FilterTag]) -> ProviderResult<Vec<Parameter>> {
        let keys = self.list_keys(filters).await?;
        let chunks = generate_chunks(&keys, self.config.chunk_size);
        let store = self.store().await?;
        fetch_parameters(store.as_ref(), &chunks).await
    }
}

#[cfg(feature = "aws")]
async fn connect_default_store() -> ProviderResult<Arc<dyn ParameterStore>> {
    Ok(Arc::new(AwsParameterStore::load().await))
}

#[cfg(not(feature = "aws"))]
async fn connect_default_store() -> ProviderResult<Arc<dyn ParameterStore>> {
    Err(ProviderError::Unavailable(
        "aws_ssm requires checkenv to be built with the `aws` feature".to_string(),
    ))
}

#[async_trait::async_trait]
impl VariableProvider for ParameterStoreProvider {
    fn name(&self) -> &str {
        "aws_ssm"
    }

    fn help(&self) -> &str {
        HELP
    }

    async fn init(&self) -> ProviderResult<()> {
        if self.config.chunk_size > MAX_FETCH_BATCH {
            return Err(ProviderError::ConfigurationError(format!(
                "chunk size {} exceeds the fetch limit of {}",
                self.config.chunk_size, MAX_FETCH_BATCH
            )));
        }
        self.store().await.map(|_| ())
    }

    async fn provide(&self, args: &str) -> ProviderResult<Variables> {
        let filters = parse_filter_tags(args);
        let parameters = self.fetch_all(&filters).await?;

        Ok(parameters
            .into_iter()
            .map(|parameter| (parameter.name, parameter.value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use super::store::MockParameterStore;

    fn config_from(pairs: &[(&str, &str)]) -> ParameterStoreConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ParameterStoreConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.page_size, None);
        assert_eq!(config.chunk_size, 10);
    }

    #[test]
    fn test_config_env_overrides() {
        let config = config_from(&[(MAX_ITERATIONS_ENV, "25"), (PAGE_SIZE_ENV, "50")]);
        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.page_size, Some(50));
    }

    #[test]
    fn test_config_invalid_env_keeps_defaults() {
        let config = config_from(&[(MAX_ITERATIONS_ENV, "0"), (PAGE_SIZE_ENV, "500")]);
        assert_eq!(config, ParameterStoreConfig::default());

        let config = config_from(&[(MAX_ITERATIONS_ENV, "many")]);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_config_setters_clamp() {
        let config = ParameterStoreConfig::default()
            .with_chunk_size(40)
            .with_page_size(0)
            .with_max_iterations(0);
        assert_eq!(config.chunk_size, MAX_FETCH_BATCH);
        assert_eq!(config.page_size, Some(1));
        assert_eq!(config.max_iterations, 1);
    }

    fn tagged_store() -> MockParameterStore {
        let mut store = MockParameterStore::new();
        store
            .expect_list_keys()
            .withf(|request| request.filters == vec![FilterTag::new("Product", "test")])
            .returning(|request| match request.next_token.as_deref() {
                None => Ok(ListPage::new(
                    vec!["/test/dev/t1".to_string()],
                    Some("page-2".to_string()),
                )),
                Some(_) => Ok(ListPage::new(vec!["/test/dev/t2".to_string()], None)),
            });
        store.expect_fetch_values().returning(|names| {
            Ok(names
                .iter()
                .map(|n| Parameter::new(n.clone(), n.to_uppercase()))
                .collect())
        });
        store
    }

    #[tokio::test]
    async fn test_provider_resolves_tagged_parameters() {
        let provider =
            ParameterStoreProvider::with_store(ParameterStoreConfig::default(), Arc::new(tagged_store()));

        provider.init().await.unwrap();
        let vars = provider.provide("Product:test").await.unwrap();

        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("/test/dev/t1").unwrap(), "/TEST/DEV/T1");
        assert_eq!(vars.get("/test/dev/t2").unwrap(), "/TEST/DEV/T2");
    }

    #[tokio::test]
    async fn test_provider_empty_filter_lists_everything() {
        let mut store = MockParameterStore::new();
        store
            .expect_list_keys()
            .withf(|request| request.filters.is_empty())
            .times(1)
            .returning(|_| Ok(ListPage::new(vec!["/any".to_string()], None)));
        store
            .expect_fetch_values()
            .returning(|_| Ok(vec![Parameter::new("/any", "1")]));

        let provider =
            ParameterStoreProvider::with_store(ParameterStoreConfig::default(), Arc::new(store));
        let vars = provider.provide("").await.unwrap();
        assert_eq!(vars.get("/any").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_provider_fails_when_fetch_fails() {
        let mut store = MockParameterStore::new();
        store
            .expect_list_keys()
            .returning(|_| Ok(ListPage::new(vec!["/a".to_string()], None)));
        store
            .expect_fetch_values()
            .returning(|_| Err(ProviderError::remote("GetParameters", "denied")));

        let provider =
            ParameterStoreProvider::with_store(ParameterStoreConfig::default(), Arc::new(store));
        assert!(provider.provide("Product:test").await.is_err());
    }

    #[tokio::test]
    async fn test_provider_runaway_pagination_fails() {
        let mut store = MockParameterStore::new();
        store.expect_list_keys().returning(|_| {
            Ok(ListPage::new(vec!["/a".to_string()], Some("more".to_string())))
        });

        let config = ParameterStoreConfig::default().with_max_iterations(3);
        let provider = ParameterStoreProvider::with_store(config, Arc::new(store));
        let result = provider.provide("Product:test").await;
        assert!(matches!(
            result,
            Err(ProviderError::PaginationLimit { limit: 3, .. })
        ));
    }

    #[cfg(not(feature = "aws"))]
    #[tokio::test]
    async fn test_init_without_aws_feature_is_unavailable() {
        let provider = ParameterStoreProvider::new(ParameterStoreConfig::default());
        assert!(matches!(
            provider.init().await,
            Err(ProviderError::Unavailable(_))
        ));
    }
}
