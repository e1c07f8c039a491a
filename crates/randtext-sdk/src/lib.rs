//! # randtext SDK
//!
//! Glue between the fetch client and the record store, plus the observable
//! state a front end binds to.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use randtext_sdk::prelude::*;
//!
//! let store = TextStore::open("randtext.db")?;
//! let client = FetchClient::new(LocalTextProvider::new());
//! let repository = TextRepository::new(client, store);
//!
//! let record = repository.generate_random(12).await?;
//! println!("{record}");
//! ```
//!
//! ## Crates
//!
//! - [`randtext_core`] - record model, query rows, content URIs
//! - [`randtext_data`] - providers and the retrying fetch client
//! - [`randtext_db`] - SQLite store with live snapshots

pub mod prelude;
mod repository;
mod session;

pub use randtext_core;
pub use randtext_data;
pub use randtext_db;

pub use repository::{RepositoryError, TextRepository};
pub use session::TextSession;
