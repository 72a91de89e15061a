//! Paginated key listing, chunking and batched value fetching

use super::filter::FilterTag;
use super::store::{ListRequest, Parameter, ParameterStore};
use crate::providers::traits::{ProviderError, ProviderResult};

/// Maximum number of names a single value fetch may request
pub const MAX_FETCH_BATCH: usize = 10;

/// Default upper bound on listing calls per resolution
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

const LIST_OPERATION: &str = "DescribeParameters";
const FETCH_OPERATION: &str = "GetParameters";

/// Split keys into consecutive chunks of at most `chunk_size` elements
///
/// Chunks keep the original order and the last one may be shorter. An
/// empty input yields no chunks. A zero size is treated as one.
pub fn generate_chunks(keys: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    keys.chunks(chunk_size.max(1)).map(<[String]>::to_vec).collect()
}

/// List every key matching `filters`, following continuation tokens
///
/// At most `max_iterations` listing calls are made. A response that still
/// carries a continuation token after the last allowed call is an error, as
/// is any failed call; no partial result is returned.
pub async fn list_parameter_keys(
    store: &dyn ParameterStore,
    filters: &[FilterTag],
    page_size: Option<i32>,
    max_iterations: usize,
) -> ProviderResult<Vec<String>> {
    let mut request = ListRequest {
        filters: filters.to_vec(),
        page_size,
        next_token: None,
    };
    let mut keys = Vec::new();

    for iteration in 1..=max_iterations {
        let page = store.list_keys(&request).await?;
        tracing::debug!(
            iteration = iteration,
            keys = page.keys.len(),
            has_more = page.next_token.is_some(),
            "Listed parameter page"
        );
        keys.extend(page.keys);

        match page.next_token {
            Some(token) => request.next_token = Some(token),
            None => {
                tracing::info!(count = keys.len(), "Retrieved parameter keys");
                return Ok(keys);
            }
        }
    }

    Err(ProviderError::PaginationLimit {
        operation: LIST_OPERATION,
        limit: max_iterations,
    })
}

/// Fetch values chunk by chunk and flatten the responses
///
/// Output follows chunk order, then response order within a chunk. The
/// first failing chunk aborts the whole fetch.
pub async fn fetch_parameters(
    store: &dyn ParameterStore,
    chunks: &[Vec<String>],
) -> ProviderResult<Vec<Parameter>> {
    let mut parameters = Vec::new();

    for chunk in chunks {
        if chunk.len() > MAX_FETCH_BATCH {
            return Err(ProviderError::ConfigurationError(format!(
                "{} accepts at most {} names per call, got {}",
                FETCH_OPERATION,
                MAX_FETCH_BATCH,
                chunk.len()
            )));
        }
        let batch = store.fetch_values(chunk).await?;
        tracing::debug!(requested = chunk.len(), returned = batch.len(), "Fetched parameter batch");
        parameters.extend(batch);
    }

    tracing::info!(count = parameters.len(), "Retrieved values for parameters");
    Ok(parameters)
}
