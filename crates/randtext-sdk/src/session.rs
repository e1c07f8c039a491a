//! Observable state for an interactive front end.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use randtext_core::TextRecord;
use randtext_data::Provider;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::repository::TextRepository;

const NOTIFICATION_CAPACITY: usize = 16;

/// Front-end state over a [`TextRepository`].
///
/// Commands run as background tasks and report failures through
/// [`notifications`](Self::notifications) instead of returning them.
/// Must be created inside a tokio runtime.
pub struct TextSession<P> {
    repository: Arc<TextRepository<P>>,
    loading: Arc<Loading>,
    notifications: broadcast::Sender<String>,
    all_texts: watch::Receiver<Vec<TextRecord>>,
    forwarder: JoinHandle<()>,
}

/// Counts generates in flight; the flag is set while any are running.
///
/// The count and the flag change under one lock so a finishing generate
/// cannot clear the flag after another has started.
struct Loading {
    in_flight: Mutex<usize>,
    flag: watch::Sender<bool>,
}

impl Loading {
    fn new() -> Self {
        Self {
            in_flight: Mutex::new(0),
            flag: watch::channel(false).0,
        }
    }

    fn count(&self) -> MutexGuard<'_, usize> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(self: &Arc<Self>) -> LoadingGuard {
        let mut n = self.count();
        *n += 1;
        self.flag.send_replace(true);
        LoadingGuard(self.clone())
    }
}

struct LoadingGuard(Arc<Loading>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut n = self.0.count();
        *n = n.saturating_sub(1);
        if *n == 0 {
            self.0.flag.send_replace(false);
        }
    }
}

impl<P: Provider + 'static> TextSession<P> {
    pub fn new(repository: TextRepository<P>) -> Self {
        let repository = Arc::new(repository);
        let (texts_tx, all_texts) = watch::channel(Vec::new());
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let mut records = repository.observe_all();
        let forwarder = tokio::spawn(async move {
            while let Some(list) = records.next().await {
                if texts_tx.send(list).is_err() {
                    break;
                }
            }
            debug!("Record forwarding stopped");
        });

        Self {
            repository,
            loading: Arc::new(Loading::new()),
            notifications,
            all_texts,
            forwarder,
        }
    }

    pub fn repository(&self) -> &TextRepository<P> {
        &self.repository
    }

    /// `true` while a generate is in flight.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.flag.subscribe()
    }

    /// Transient user-facing messages.
    pub fn notifications(&self) -> broadcast::Receiver<String> {
        self.notifications.subscribe()
    }

    /// Latest record list, newest first. Empty until the store first reports.
    pub fn all_texts(&self) -> watch::Receiver<Vec<TextRecord>> {
        self.all_texts.clone()
    }

    /// Fetch and store one random text in the background.
    pub fn generate_random(&self, length: u32) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let notifications = self.notifications.clone();
        let guard = self.loading.start();

        tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = repository.generate_random(length).await {
                warn!(error = %e, "Generate failed");
                // no receivers is fine
                let _ = notifications.send(format!("Failed: {}", e));
            }
        })
    }

    /// Delete one record in the background.
    pub fn delete(&self, id: i64) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            if let Err(e) = repository.delete(id).await {
                warn!(id, error = %e, "Delete failed");
                let _ = notifications.send(format!("Failed to delete: {}", e));
            }
        })
    }

    /// Delete every record in the background.
    pub fn delete_all(&self) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            if let Err(e) = repository.delete_all().await {
                warn!(error = %e, "Delete all failed");
                let _ = notifications.send(format!("Failed to delete all: {}", e));
            }
        })
    }
}

impl<P> Drop for TextSession<P> {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}
