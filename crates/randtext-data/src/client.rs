//! Retrying, timeout-bounded fetch client.

use std::future::Future;

use randtext_core::{ContentUri, PayloadError, RandomTextResponse, RequestId, Value};
use tracing::{debug, error, info_span, Instrument};

use crate::provider::{Provider, ProviderError, QueryArgs, DATA_COLUMN};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::timeout::{with_timeout, TimeoutConfig, TimeoutError};

/// Error type for fetch operations.
///
/// Every per-try failure is retried; callers only ever see `Exhausted`,
/// `Unknown`, `InvalidArgument` or `Cancelled`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Query(#[from] ProviderError),

    #[error("Provider returned null cursor")]
    NullCursor,

    #[error("No rows from provider")]
    Empty,

    #[error("'{0}' column missing")]
    MissingColumn(String),

    #[error("'{0}' column is not text")]
    NotText(String),

    #[error("Parse error: {0}")]
    Parse(#[from] PayloadError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("{last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("Unknown error")]
    Unknown,
}

impl FetchError {
    /// The final per-try cause behind an exhausted fetch.
    pub fn last_cause(&self) -> &FetchError {
        match self {
            Self::Exhausted { last, .. } => last,
            other => other,
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

/// Fetches random text from a provider.
///
/// Each try is bounded by the policy's total timeout; failed tries are
/// retried with the policy's backoff until the attempt budget is spent.
/// The client keeps no per-call state, so concurrent fetches are
/// independent.
pub struct FetchClient<P> {
    provider: P,
    uri: ContentUri,
    policy: FetchPolicy,
}

impl<P: Provider> FetchClient<P> {
    /// Create a client for the default text URI and policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            uri: ContentUri::default(),
            policy: FetchPolicy::default(),
        }
    }

    /// Query a different resource.
    pub fn with_uri(mut self, uri: ContentUri) -> Self {
        self.uri = uri;
        self
    }

    /// Set the fetch policy.
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn uri(&self) -> &ContentUri {
        &self.uri
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetch one random text with `max_length` as the length hint.
    pub async fn fetch_random(&self, max_length: u32) -> Result<RandomTextResponse, FetchError> {
        if max_length == 0 {
            return Err(FetchError::InvalidArgument(
                "max_length must be positive".to_string(),
            ));
        }

        let request_id = RequestId::generate();
        let span = info_span!("fetch_random", %request_id, uri = %self.uri, max_length);

        async {
            debug!("Fetching random string with max_length={}", max_length);
            retry_with_backoff(&self.policy.retry, |_| self.try_once(max_length))
                .await
                .map_err(|exhausted| match exhausted.last {
                    Some(last) => FetchError::Exhausted {
                        attempts: exhausted.attempts,
                        last: Box::new(last),
                    },
                    None => FetchError::Unknown,
                })
        }
        .instrument(span)
        .await
    }

    /// Like [`fetch_random`](Self::fetch_random), but gives up as soon as
    /// `cancel` completes, without further retries.
    pub async fn fetch_random_until<C>(
        &self,
        max_length: u32,
        cancel: C,
    ) -> Result<RandomTextResponse, FetchError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!("Fetch cancelled by caller");
                Err(FetchError::Cancelled)
            }
            result = self.fetch_random(max_length) => result,
        }
    }

    async fn try_once(&self, max_length: u32) -> Result<RandomTextResponse, FetchError> {
        with_timeout(self.policy.timeout.total, self.query_once(max_length)).await?
    }

    async fn query_once(&self, max_length: u32) -> Result<RandomTextResponse, FetchError> {
        let args = QueryArgs::data(max_length);
        let result = self.provider.query(&self.uri, &args).await.map_err(|e| {
            error!(error = %e, "Error querying provider");
            e
        })?;

        let Some(result) = result else {
            error!("Provider returned null cursor");
            return Err(FetchError::NullCursor);
        };
        let Some(row) = result.first() else {
            error!("No rows returned from provider");
            return Err(FetchError::Empty);
        };

        let cell = row.get(DATA_COLUMN).ok_or_else(|| {
            error!("'{}' column missing in result", DATA_COLUMN);
            FetchError::MissingColumn(DATA_COLUMN.to_string())
        })?;
        let json = cell.as_text().ok_or_else(|| {
            error!(kind = describe(cell), "'{}' column is not text", DATA_COLUMN);
            FetchError::NotText(DATA_COLUMN.to_string())
        })?;
        debug!("Received JSON: {}", json);

        let response = RandomTextResponse::from_json(json).map_err(|e| {
            error!(error = %e, "Error parsing JSON");
            e
        })?;
        debug!(?response, "Parsed response");

        Ok(response)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}
