//! AWS SDK backend for the parameter store

use super::store::{ListPage, ListRequest, Parameter, ParameterStore};
use crate::providers::traits::{ProviderError, ProviderResult};
use aws_sdk_ssm::types::ParameterStringFilter;
use aws_sdk_ssm::Client;

/// Parameter store backed by AWS Systems Manager
#[derive(Debug, Clone)]
pub struct AwsParameterStore {
    client: Client,
}

impl AwsParameterStore {
    /// Load the shared AWS configuration (`~/.aws/config`, environment, IMDS)
    pub async fn load() -> Self {
        let config = aws_config::load_from_env().await;
        Self::from_client(Client::new(&config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ParameterStore for AwsParameterStore {
    async fn list_keys(&self, request: &ListRequest) -> ProviderResult<ListPage> {
        let filters = request
            .filters
            .iter()
            .map(|tag| {
                ParameterStringFilter::builder()
                    .key(tag.filter_key())
                    .values(tag.value.clone())
                    .build()
                    .map_err(|e| ProviderError::ConfigurationError(e.to_string()))
            })
            .collect::<ProviderResult<Vec<_>>>()?;

        let output = self
            .client
            .describe_parameters()
            .set_parameter_filters(Some(filters))
            .set_max_results(request.page_size)
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(|e| ProviderError::remote("DescribeParameters", e.into_service_error()))?;

        let keys = output
            .parameters()
            .iter()
            .filter_map(|p| p.name().map(str::to_string))
            .collect();

        Ok(ListPage::new(keys, output.next_token().map(str::to_string)))
    }

    async fn fetch_values(&self, names: &[String]) -> ProviderResult<Vec<Parameter>> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .send()
            .await
            .map_err(|e| ProviderError::remote("GetParameters", e.into_service_error()))?;

        Ok(output
            .parameters()
            .iter()
            .filter_map(|p| match (p.name(), p.value()) {
                (Some(name), Some(value)) => Some(Parameter::new(name, value)),
                _ => None,
            })
            .collect())
    }
}
