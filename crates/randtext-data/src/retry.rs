//! Retry policies for fetch operations.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff: `base * 2^attempt`, capped at `max`.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Exponential backoff with a cap that never clamps short schedules.
    pub fn exponential(base: Duration) -> Self {
        Self::Exponential {
            base,
            max: Duration::from_secs(60),
        }
    }

    /// Calculate delay after a failed attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
                base.checked_mul(multiplier)
                    .map_or(*max, |delay| delay.min(*max))
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(400))
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    /// Create a new retry policy with the default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
        }
    }

    /// A single try, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: BackoffStrategy::None,
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Delay to wait after `attempt` failed, or `None` if it was the last.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            None
        } else {
            Some(self.backoff.delay_for_attempt(attempt))
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Every try failed.
///
/// `last` is `None` only when the policy allowed zero tries.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: Option<E>,
}

impl<E: fmt::Display> fmt::Display for Exhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last {
            Some(e) => write!(f, "all {} attempts failed, last error: {}", self.attempts, e),
            None => write!(f, "unknown error after {} attempts", self.attempts),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Exhausted<E> {}

/// Run `op` until it succeeds or the policy's attempt budget is spent.
///
/// `op` receives the 0-indexed attempt number. Failed attempts are followed
/// by the policy's backoff delay, except the last one. Dropping the returned
/// future stops any in-progress attempt or sleep.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut last = None;

    for attempt in 0..policy.max_attempts {
        debug!("Attempt {} of {}", attempt + 1, policy.max_attempts);
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(error = %e, "Attempt {} failed", attempt + 1);
                last = Some(e);
            }
        }

        if let Some(delay) = policy.delay_after(attempt) {
            tokio::time::sleep(delay).await;
        }
    }

    let exhausted = Exhausted {
        attempts: policy.max_attempts,
        last,
    };
    error!("{}", exhausted);
    Err(exhausted)
}
