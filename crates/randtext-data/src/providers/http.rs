//! Provider backed by an HTTP endpoint.

use async_trait::async_trait;
use randtext_core::{ContentUri, QueryResult};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::provider::{Provider, ProviderError, QueryArgs, DATA_COLUMN};
use crate::timeout::TimeoutConfig;

/// Forwards queries to `GET {endpoint}?uri=...&limit=N`.
///
/// The response body is taken as the JSON payload. An empty body yields a
/// result set without rows.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    endpoint: String,
}

impl HttpProvider {
    /// Build a provider for `endpoint`, using the connect timeout from
    /// `timeouts`. The total per-try timeout is enforced by the fetch client.
    pub fn new(endpoint: impl Into<String>, timeouts: &TimeoutConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .user_agent(concat!("randtext/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Query(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn query(
        &self,
        uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        let mut params = vec![("uri", uri.to_string())];
        if let Some(limit) = args.limit {
            params.push(("limit", limit.to_string()));
        }

        debug!(endpoint = %self.endpoint, "Querying HTTP provider");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::Unreachable(e.to_string())
                } else {
                    ProviderError::Query(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Denied(format!("HTTP {} from {}", status, self.endpoint)));
        }
        if !status.is_success() {
            return Err(ProviderError::Query(format!("HTTP {} from {}", status, self.endpoint)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Query(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Some(QueryResult::empty(vec![DATA_COLUMN.to_string()])));
        }

        Ok(Some(QueryResult::single(DATA_COLUMN, body)))
    }
}
