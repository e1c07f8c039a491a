//! Fetch-then-store repository.

use randtext_core::{NewTextRecord, TextRecord};
use randtext_data::{FetchClient, FetchError, Provider};
use randtext_db::{DbError, RecordStream, TextStore};
use tracing::{info, warn};

/// Repository errors.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] DbError),
}

/// Pairs a fetch client with the store its results land in.
pub struct TextRepository<P> {
    client: FetchClient<P>,
    store: TextStore,
}

impl<P: Provider> TextRepository<P> {
    pub fn new(client: FetchClient<P>, store: TextStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &FetchClient<P> {
        &self.client
    }

    pub fn store(&self) -> &TextStore {
        &self.store
    }

    /// Fetch one random text and persist it.
    ///
    /// The stored length is always the character count of the value, even
    /// when the provider reported something else.
    pub async fn generate_random(&self, length: u32) -> Result<TextRecord, RepositoryError> {
        let payload = self.client.fetch_random(length).await?.random_text;
        if !payload.length_matches() {
            warn!(
                reported = payload.length,
                actual = payload.value.chars().count(),
                "Provider length disagrees with value, using character count"
            );
        }

        let record = self.store.insert(NewTextRecord::from_payload(payload)).await?;
        info!(id = record.id, length = record.length, "Stored random text");
        Ok(record)
    }

    /// Remove one record. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.store.delete(id).await?)
    }

    /// Remove every record. Returns how many were removed.
    pub async fn delete_all(&self) -> Result<usize, RepositoryError> {
        Ok(self.store.delete_all().await?)
    }

    pub async fn list_all(&self) -> Result<Vec<TextRecord>, RepositoryError> {
        Ok(self.store.list_all().await?)
    }

    /// Live record list, newest first.
    pub fn observe_all(&self) -> RecordStream {
        self.store.subscribe()
    }
}
