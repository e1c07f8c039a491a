use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use randtext_core::{ContentUri, QueryResult, Value};
use randtext_data::{
    FetchClient, FetchError, FetchPolicy, Provider, ProviderError, QueryArgs, RetryPolicy,
    TimeoutConfig, DATA_COLUMN,
};
use tokio::time::Instant;

const GOOD: &str = r#"{"randomText":{"value":"abc123","length":6,"created":"2024-05-01 10:00:00"}}"#;

enum Step {
    Fail(&'static str),
    Hang,
    Respond(Option<QueryResult>),
}

/// Plays back a fixed sequence of outcomes and records when each call happened.
struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(Instant, QueryArgs)>>,
}

impl ScriptedProvider {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn query(
        &self,
        _uri: &ContentUri,
        args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        self.calls.lock().unwrap().push((Instant::now(), args.clone()));
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Fail(msg)) => Err(ProviderError::Query(msg.to_string())),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Query("woke up".to_string()))
            }
            Some(Step::Respond(result)) => Ok(result),
            None => Err(ProviderError::Query("script exhausted".to_string())),
        }
    }
}

fn good() -> Step {
    Step::Respond(Some(QueryResult::single(DATA_COLUMN, GOOD)))
}

fn client(steps: Vec<Step>) -> FetchClient<std::sync::Arc<ScriptedProvider>> {
    FetchClient::new(std::sync::Arc::new(ScriptedProvider::new(steps)))
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_third_try_after_backoff() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![
        Step::Fail("first"),
        Step::Fail("second"),
        good(),
    ]));
    let client = FetchClient::new(provider.clone());

    let response = client.fetch_random(6).await.unwrap();
    assert_eq!(response.random_text.value, "abc123");

    let times = provider.call_times();
    assert_eq!(times.len(), 3);
    let first_gap = times[1] - times[0];
    let second_gap = times[2] - times[1];
    assert!(first_gap >= Duration::from_millis(400) && first_gap < Duration::from_millis(450));
    assert!(second_gap >= Duration::from_millis(800) && second_gap < Duration::from_millis(850));
}

#[tokio::test(start_paused = true)]
async fn test_all_tries_fail_with_last_cause() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![
        Step::Fail("first"),
        Step::Fail("second"),
        Step::Fail("third"),
        good(),
    ]));
    let client = FetchClient::new(provider.clone());

    let err = client.fetch_random(6).await.unwrap_err();
    match &err {
        FetchError::Exhausted { attempts, last } => {
            assert_eq!(*attempts, 3);
            assert!(matches!(**last, FetchError::Query(ProviderError::Query(ref m)) if m == "third"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("third"));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_first_try_success_does_not_wait() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![good(), good()]));
    let client = FetchClient::new(provider.clone());
    let start = Instant::now();

    client.fetch_random(6).await.unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failed_try() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![Step::Hang, good()]));
    let client = FetchClient::new(provider.clone());
    let start = Instant::now();

    let response = client.fetch_random(6).await.unwrap();
    assert_eq!(response.random_text.length, 6);

    assert_eq!(provider.call_count(), 2);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(5_400));
    assert!(elapsed < Duration::from_millis(5_500));
}

#[tokio::test(start_paused = true)]
async fn test_all_timeouts_exhaust_budget() {
    let client = client(vec![Step::Hang, Step::Hang, Step::Hang]);
    let start = Instant::now();

    let err = client.fetch_random(6).await.unwrap_err();
    assert!(matches!(err.last_cause(), FetchError::Timeout(_)));
    // three 5s tries plus 400ms and 800ms of backoff
    assert!(start.elapsed() >= Duration::from_millis(16_200));
}

#[tokio::test(start_paused = true)]
async fn test_missing_field_is_parse_failure() {
    let bad = || Step::Respond(Some(QueryResult::single(DATA_COLUMN, r#"{"randomText":{"value":"x"}}"#)));
    let client = client(vec![bad(), bad(), bad()]);

    let err = client.fetch_random(6).await.unwrap_err();
    assert!(matches!(err.last_cause(), FetchError::Parse(_)));
}

#[tokio::test(start_paused = true)]
async fn test_result_shape_failures() {
    let client = client(vec![
        Step::Respond(Some(QueryResult::empty(vec![DATA_COLUMN.to_string()]))),
        Step::Respond(None),
        Step::Respond(Some(QueryResult::single("other", GOOD))),
    ]);

    let err = client.fetch_random(6).await.unwrap_err();
    assert!(matches!(err.last_cause(), FetchError::MissingColumn(c) if c == DATA_COLUMN));

    let client = self::client(vec![
        Step::Respond(Some(QueryResult::single(DATA_COLUMN, Value::Integer(1)))),
        Step::Respond(Some(QueryResult::single(DATA_COLUMN, "not json"))),
        Step::Respond(None),
    ]);
    let err = client.fetch_random(6).await.unwrap_err();
    assert!(matches!(err.last_cause(), FetchError::NullCursor));
}

#[tokio::test(start_paused = true)]
async fn test_passes_length_hint_and_projection() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![good()]));
    let client = FetchClient::new(provider.clone());

    client.fetch_random(42).await.unwrap();

    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls[0].1, QueryArgs::data(42));
}

#[tokio::test(start_paused = true)]
async fn test_zero_length_rejected_without_query() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![good()]));
    let client = FetchClient::new(provider.clone());

    let err = client.fetch_random(0).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidArgument(_)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_attempt_policy_is_unknown_error() {
    let policy = FetchPolicy::new(TimeoutConfig::default(), RetryPolicy::new(0));
    let client = client(vec![good()]).with_policy(policy);

    let err = client.fetch_random(6).await.unwrap_err();
    assert!(matches!(err, FetchError::Unknown));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff_stops_retrying() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![
        Step::Fail("first"),
        Step::Fail("second"),
        good(),
    ]));
    let client = FetchClient::new(provider.clone());

    // first failure at 0ms, second at 400ms, cancel lands inside the 800ms wait
    let err = client
        .fetch_random_until(6, tokio::time::sleep(Duration::from_millis(500)))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Cancelled));
    assert_eq!(provider.call_count(), 2);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_are_independent() {
    let provider = std::sync::Arc::new(ScriptedProvider::new(vec![good(), good()]));
    let client = FetchClient::new(provider.clone());

    let (a, b) = tokio::join!(client.fetch_random(6), client.fetch_random(6));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(provider.call_count(), 2);
}
