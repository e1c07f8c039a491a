//! Logging setup for randtext binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once
//! to install a subscriber writing to stderr.

mod logging;

pub use logging::*;
