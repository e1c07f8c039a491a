//! Provider access with per-try timeouts and exponential backoff.
//!
//! This crate provides:
//! - `FetchClient` - Retrying, timeout-bounded provider query
//! - `Provider` - Query interface for text providers
//! - `TimeoutConfig` - Per-try timeouts
//! - `RetryPolicy` - Attempt budget and backoff schedule

mod client;
mod provider;
pub mod providers;
mod retry;
mod timeout;

pub use client::*;
pub use provider::*;
pub use retry::*;
pub use timeout::*;
