//! SQLite-backed text record store with live snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use randtext_db::TextStore;
//! use randtext_core::NewTextRecord;
//!
//! let store = TextStore::open("randtext.db")?;
//! let mut snapshots = store.subscribe();
//!
//! store.insert(NewTextRecord::new("abc123", "2024-05-01")).await?;
//!
//! // Current snapshot, then one per mutation, newest record first
//! while let Some(records) = snapshots.next().await {
//!     println!("{} records", records.len());
//! }
//! ```

mod db;
mod error;
mod store;

pub use db::Db;
pub use error::DbError;
pub use store::{RecordStream, TextStore};
pub use randtext_core::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, RecordStream, TextStore, Value};
}

/// Create a parameter list for SQL statements.
///
/// # Example
///
/// ```rust,ignore
/// use randtext_db::params;
///
/// let params = params!["value", 42i64];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
