//! Core types for the randtext fetch and store pipeline.
//!
//! This crate provides the fundamental types shared by every layer:
//! - `TextRecord` / `NewTextRecord` - Persisted text entries
//! - `RandomTextResponse` - Provider wire payload
//! - `ContentUri` - Provider resource identifier
//! - `QueryResult` / `Row` / `Value` - Cursor-like provider results
//! - `RequestId` - Correlation id for a single fetch

mod context;
mod model;
mod rows;
mod uri;

pub use context::*;
pub use model::*;
pub use rows::*;
pub use uri::*;
