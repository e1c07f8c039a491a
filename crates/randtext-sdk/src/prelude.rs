//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use randtext_sdk::prelude::*;
//! ```

pub use randtext_core::{ContentUri, NewTextRecord, RandomTextResponse, TextRecord};
pub use randtext_data::providers::{HttpProvider, LocalTextProvider};
pub use randtext_data::{FetchClient, FetchError, FetchPolicy, Provider, RetryPolicy, TimeoutConfig};
pub use randtext_db::{DbError, RecordStream, TextStore};

pub use crate::{RepositoryError, TextRepository, TextSession};
