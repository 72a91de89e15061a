//! Remote parameter store contract
//!
//! The parameter-store provider only needs two remote operations: a
//! paginated, tag-filtered key listing and a batched value fetch. Any
//! backend implementing [`ParameterStore`] can stand in for the real
//! service.

use super::filter::FilterTag;
use crate::providers::traits::ProviderResult;

/// A single listing call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Tag equality constraints
    pub filters: Vec<FilterTag>,
    /// Page-size hint, `None` leaves the service default
    pub page_size: Option<i32>,
    /// Continuation token from the previous page
    pub next_token: Option<String>,
}

/// One page of listed keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub next_token: Option<String>,
}

impl ListPage {
    pub fn new(keys: Vec<String>, next_token: Option<String>) -> Self {
        Self { keys, next_token }
    }
}

/// A resolved parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Remote operations backing the parameter-store provider
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// List one page of parameter keys matching the request filters
    async fn list_keys(&self, request: &ListRequest) -> ProviderResult<ListPage>;

    /// Fetch values for the named parameters
    ///
    /// Names that do not exist are left out of the response.
    async fn fetch_values(&self, names: &[String]) -> ProviderResult<Vec<Parameter>>;
}
