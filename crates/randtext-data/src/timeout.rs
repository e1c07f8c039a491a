//! Timeout configuration for fetch operations.

use std::future::Future;
use std::time::Duration;

/// Timeout configuration for a single fetch try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout, used by network-backed providers.
    pub connect: Duration,
    /// Total time allowed for one try.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_millis(5_000))
    }
}

/// Error when a try exceeds its time budget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// Run `fut`, failing with [`TimeoutError`] once `limit` elapses.
///
/// The inner future is dropped on expiry.
pub async fn with_timeout<F: Future>(limit: Duration, fut: F) -> Result<F::Output, TimeoutError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimeoutError(limit))
}
