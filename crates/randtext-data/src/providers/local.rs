//! In-process provider that generates random alphanumeric text.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use randtext_core::{ContentUri, QueryResult, RandomText, RandomTextResponse};
use tracing::debug;

use crate::provider::{Provider, ProviderError, QueryArgs, DATA_COLUMN};

/// Longest text the local provider will generate.
pub const MAX_LOCAL_LENGTH: u32 = 1 << 20;

/// Answers queries for one authority with a freshly generated payload.
///
/// Results mimic a device content provider: a single row whose `data`
/// column holds the JSON payload.
#[derive(Debug, Clone)]
pub struct LocalTextProvider {
    authority: String,
    default_length: u32,
}

impl LocalTextProvider {
    /// Serve the authority of the default text URI.
    pub fn new() -> Self {
        Self {
            authority: ContentUri::default().authority().to_string(),
            default_length: 16,
        }
    }

    /// Serve a different authority.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Length used when a query carries no limit.
    pub fn with_default_length(mut self, length: u32) -> Self {
        self.default_length = length;
        self
    }

    fn generate(length: u32) -> RandomTextResponse {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length as usize)
            .map(char::from)
            .collect();

        RandomTextResponse::new(RandomText {
            length: i64::from(length),
            value,
            created: chrono::Local::now().to_rfc3339(),
        })
    }
}

impl Default for LocalTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for LocalTextProvider {
    async fn query(
        &self,
        uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        if uri.authority() != self.authority {
            return Err(ProviderError::Denied(format!(
                "no provider registered for {}",
                uri
            )));
        }
        if !args.projection.is_empty() && !args.projection.iter().any(|c| c == DATA_COLUMN) {
            return Ok(Some(QueryResult::empty(args.projection.clone())));
        }

        let length = args.limit.unwrap_or(self.default_length);
        if length > MAX_LOCAL_LENGTH {
            return Err(ProviderError::Query(format!(
                "length {} exceeds the local limit of {}",
                length, MAX_LOCAL_LENGTH
            )));
        }

        debug!(length, "Generating local random text");
        // off the runtime thread so the caller's timeout can still fire
        let json = tokio::task::spawn_blocking(move || Self::generate(length).to_json())
            .await
            .map_err(|e| ProviderError::Query(format!("generator failed: {}", e)))?;

        Ok(Some(QueryResult::single(DATA_COLUMN, json)))
    }
}
