//! Text record store with live snapshots.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::Stream;
use randtext_core::{NewTextRecord, TextRecord};
use tokio::sync::watch;
use tracing::debug;

use crate::{params, Db, DbError};

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_random_texts",
    include_str!("../migrations/001_random_texts.sql"),
)];

const SELECT_ALL: &str = "SELECT id, value, length, created FROM random_texts ORDER BY id DESC";

/// Caller-owned handle to the `random_texts` table.
///
/// Cloning is cheap and every clone shares the same connection and
/// subscribers. Subscribers receive the full list after every mutation
/// that changed at least one row.
#[derive(Clone, Debug)]
pub struct TextStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    db: Mutex<Db>,
    snapshots: watch::Sender<Vec<TextRecord>>,
}

impl TextStore {
    /// Open (or create) a store backed by a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Self::from_db(Db::open(path)?)
    }

    /// Like [`open`](Self::open), but opens and migrates on the blocking pool.
    pub async fn connect(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        tokio::task::spawn_blocking(move || Self::open(path))
            .await
            .map_err(|e| DbError::Background(e.to_string()))?
    }

    /// Open a store that lives only as long as this handle.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_db(Db::open_in_memory()?)
    }

    fn from_db(db: Db) -> Result<Self, DbError> {
        for (name, sql) in MIGRATIONS {
            db.migrate(name, sql)?;
        }
        let initial: Vec<TextRecord> = db.query_as(SELECT_ALL, params![])?;
        let (snapshots, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(Inner {
                db: Mutex::new(db),
                snapshots,
            }),
        })
    }

    /// Append a record and return it with its generated id.
    pub async fn insert(&self, record: NewTextRecord) -> Result<TextRecord, DbError> {
        self.write(move |db| {
            db.execute(
                "INSERT INTO random_texts (value, length, created) VALUES (?1, ?2, ?3)",
                params![record.value(), record.length(), record.created()],
            )?;
            let id = db.last_insert_rowid();
            debug!(id, "Inserted random text");
            Ok((TextRecord::from_new(id, record), true))
        })
        .await
    }

    /// Delete one record. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        self.write(move |db| {
            let removed = db.execute("DELETE FROM random_texts WHERE id = ?1", params![id])? > 0;
            debug!(id, removed, "Deleted random text");
            Ok((removed, removed))
        })
        .await
    }

    /// Delete every record. Returns the number of rows removed.
    pub async fn delete_all(&self) -> Result<usize, DbError> {
        self.write(|db| {
            let removed = db.execute("DELETE FROM random_texts", params![])?;
            debug!(removed, "Deleted all random texts");
            Ok((removed, removed > 0))
        })
        .await
    }

    /// All records, newest first.
    pub async fn list_all(&self) -> Result<Vec<TextRecord>, DbError> {
        self.read(|db| db.query_as(SELECT_ALL, params![])).await
    }

    /// Look up one record.
    pub async fn get(&self, id: i64) -> Result<Option<TextRecord>, DbError> {
        self.read(move |db| {
            db.query_optional(
                "SELECT id, value, length, created FROM random_texts WHERE id = ?1",
                params![id],
            )
        })
        .await
    }

    /// Subscribe to the record list.
    ///
    /// The stream yields the current list first, then the latest list after
    /// each mutation. It ends when the last store handle is dropped.
    pub fn subscribe(&self) -> RecordStream {
        RecordStream {
            rx: self.inner.snapshots.subscribe(),
            primed: false,
        }
    }

    /// Most recently published list.
    pub fn snapshot(&self) -> Vec<TextRecord> {
        self.inner.snapshots.borrow().clone()
    }

    async fn read<T, F>(&self, f: F) -> Result<T, DbError>
    where
        T: Send + 'static,
        F: FnOnce(&Db) -> Result<T, DbError> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let db = inner.lock()?;
            f(&db)
        })
        .await
        .map_err(|e| DbError::Background(e.to_string()))?
    }

    /// Run a mutation; `f` returns its result plus whether rows changed.
    async fn write<T, F>(&self, f: F) -> Result<T, DbError>
    where
        T: Send + 'static,
        F: FnOnce(&Db) -> Result<(T, bool), DbError> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let db = inner.lock()?;
            let (result, changed) = f(&db)?;
            if changed {
                let records: Vec<TextRecord> = db.query_as(SELECT_ALL, params![])?;
                inner.snapshots.send_replace(records);
            }
            Ok(result)
        })
        .await
        .map_err(|e| DbError::Background(e.to_string()))?
    }
}

impl Inner {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Db>, DbError> {
        self.db
            .lock()
            .map_err(|_| DbError::Background("connection lock poisoned".to_string()))
    }
}

/// Live sequence of record lists published by a [`TextStore`].
///
/// Slow readers skip intermediate lists but always see the latest one.
pub struct RecordStream {
    rx: watch::Receiver<Vec<TextRecord>>,
    primed: bool,
}

impl RecordStream {
    /// Wait for the next list. Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<TextRecord>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Adapt into a `futures::Stream`.
    pub fn into_stream(self) -> impl Stream<Item = Vec<TextRecord>> + Send + 'static {
        futures::stream::unfold(self, |mut s| async move {
            let records = s.next().await?;
            Some((records, s))
        })
    }
}
