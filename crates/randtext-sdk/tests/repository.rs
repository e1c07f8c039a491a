use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use randtext_core::{ContentUri, QueryResult, TextRecord};
use randtext_data::providers::LocalTextProvider;
use randtext_data::{FetchClient, Provider, ProviderError, QueryArgs, DATA_COLUMN};
use randtext_db::TextStore;
use randtext_sdk::{RepositoryError, TextRepository, TextSession};

/// Always answers with the same payload.
struct FixedProvider(&'static str);

#[async_trait]
impl Provider for FixedProvider {
    async fn query(
        &self,
        _uri: &ContentUri,
        _args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        Ok(Some(QueryResult::single(DATA_COLUMN, self.0)))
    }
}

/// Never answers successfully.
#[derive(Default)]
struct OfflineProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl Provider for OfflineProvider {
    async fn query(
        &self,
        _uri: &ContentUri,
        _args: &QueryArgs,
    ) -> Result<Option<QueryResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Unreachable("offline".to_string()))
    }
}

fn repository<P: Provider>(provider: P) -> TextRepository<P> {
    TextRepository::new(FetchClient::new(provider), TextStore::open_in_memory().unwrap())
}

#[tokio::test]
async fn test_generate_stores_record() {
    let repo = repository(LocalTextProvider::new());

    let record = repo.generate_random(12).await.unwrap();
    assert_eq!(record.length, 12);
    assert_eq!(record.value.chars().count(), 12);

    assert_eq!(repo.list_all().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_generate_uses_character_count_over_reported_length() {
    let repo = repository(FixedProvider(
        r#"{"randomText":{"value":"abc123","length":99,"created":"2024-05-01 10:00:00"}}"#,
    ));

    let record = repo.generate_random(6).await.unwrap();
    assert_eq!(record.value, "abc123");
    assert_eq!(record.length, 6);
    assert_eq!(record.created, "2024-05-01 10:00:00");
}

#[tokio::test(start_paused = true)]
async fn test_generate_failure_stores_nothing() {
    let provider = Arc::new(OfflineProvider::default());
    let repo = repository(provider.clone());

    let err = repo.generate_random(6).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Fetch(_)));
    assert!(err.to_string().contains("offline"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_delete_all() {
    let repo = repository(LocalTextProvider::new());
    let a = repo.generate_random(4).await.unwrap();
    let b = repo.generate_random(4).await.unwrap();
    repo.generate_random(4).await.unwrap();

    assert!(repo.delete(a.id).await.unwrap());
    assert!(!repo.delete(a.id).await.unwrap());
    assert!(!repo.list_all().await.unwrap().contains(&a));
    assert!(repo.list_all().await.unwrap().contains(&b));

    assert_eq!(repo.delete_all().await.unwrap(), 2);
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_observe_all_follows_mutations() {
    let repo = repository(LocalTextProvider::new());
    let mut lists = repo.observe_all().into_stream().boxed();

    assert!(lists.next().await.unwrap().is_empty());

    let record = repo.generate_random(8).await.unwrap();
    assert_eq!(lists.next().await.unwrap(), vec![record.clone()]);

    repo.delete(record.id).await.unwrap();
    assert!(lists.next().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_publishes_generated_texts() {
    let session = TextSession::new(repository(LocalTextProvider::new()));
    let mut texts = session.all_texts();

    session.generate_random(10).await.unwrap();

    let list: Vec<TextRecord> = texts.wait_for(|l| l.len() == 1).await.unwrap().clone();
    assert_eq!(list[0].length, 10);
    assert!(!*session.loading().borrow());

    session.delete_all().await.unwrap();
    texts.wait_for(|l| l.is_empty()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_session_failure_notifies_and_clears_loading() {
    let session = TextSession::new(repository(OfflineProvider::default()));
    let mut notifications = session.notifications();
    let loading = session.loading();

    let task = session.generate_random(6);
    assert!(*loading.borrow());

    let message = notifications.recv().await.unwrap();
    assert!(message.starts_with("Failed: "));
    assert!(message.contains("offline"));

    task.await.unwrap();
    assert!(!*loading.borrow());
    assert!(session.all_texts().borrow().is_empty());
}

#[tokio::test]
async fn test_session_delete_of_missing_id_is_quiet() {
    let session = TextSession::new(repository(LocalTextProvider::new()));
    let mut notifications = session.notifications();

    session.delete(12345).await.unwrap();
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_dropping_session_stops_forwarding() {
    let session = TextSession::new(repository(LocalTextProvider::new()));
    let mut texts = session.all_texts();
    drop(session);

    let ended = tokio::time::timeout(Duration::from_secs(1), async {
        while texts.changed().await.is_ok() {}
    })
    .await;
    assert!(ended.is_ok());
}
