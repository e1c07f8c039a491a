//! Built-in providers.

mod http;
mod local;

pub use http::HttpProvider;
pub use local::{LocalTextProvider, MAX_LOCAL_LENGTH};
