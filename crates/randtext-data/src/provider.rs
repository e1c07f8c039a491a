//! Query interface for text providers.

use std::sync::Arc;

use async_trait::async_trait;
use randtext_core::{ContentUri, QueryResult};

/// Column holding the JSON payload in provider results.
pub const DATA_COLUMN: &str = "data";

/// Error raised by a provider query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    #[error("Access denied: {0}")]
    Denied(String),

    #[error("Query error: {0}")]
    Query(String),
}

/// Arguments passed along with a provider query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryArgs {
    /// Columns requested.
    pub projection: Vec<String>,
    /// Length hint / row limit.
    pub limit: Option<u32>,
}

impl QueryArgs {
    /// Project the payload column with a length hint.
    pub fn data(limit: u32) -> Self {
        Self {
            projection: vec![DATA_COLUMN.to_string()],
            limit: Some(limit),
        }
    }
}

/// An external source of text payloads.
///
/// `Ok(None)` means the provider answered without a result set.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn query(
        &self,
        uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    async fn query(
        &self,
        uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        (**self).query(uri, args).await
    }
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    async fn query(
        &self,
        uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        (**self).query(uri, args).await
    }
}
