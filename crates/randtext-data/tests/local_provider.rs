use std::time::{Duration, Instant};

use randtext_data::providers::{LocalTextProvider, MAX_LOCAL_LENGTH};
use randtext_data::{FetchClient, FetchError, FetchPolicy, ProviderError, RetryPolicy, TimeoutConfig};

fn client(timeout: Duration) -> FetchClient<LocalTextProvider> {
    FetchClient::new(LocalTextProvider::new()).with_policy(FetchPolicy::new(
        TimeoutConfig::from_total(timeout),
        RetryPolicy::none(),
    ))
}

#[tokio::test]
async fn test_oversized_length_fails_fast() {
    let start = Instant::now();

    let err = client(Duration::from_millis(20))
        .fetch_random(60_000_000)
        .await
        .unwrap_err();

    assert!(matches!(err.last_cause(), FetchError::Query(ProviderError::Query(_))));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_timeout_fires_while_generating() {
    let start = Instant::now();

    let err = client(Duration::from_millis(1))
        .fetch_random(MAX_LOCAL_LENGTH)
        .await
        .unwrap_err();

    assert!(matches!(err.last_cause(), FetchError::Timeout(_)));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_max_length_is_generated() {
    let response = client(Duration::from_secs(30))
        .fetch_random(MAX_LOCAL_LENGTH)
        .await
        .unwrap();

    assert_eq!(response.random_text.value.len(), MAX_LOCAL_LENGTH as usize);
}
