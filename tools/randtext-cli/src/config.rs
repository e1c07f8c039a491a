//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use randtext_core::ContentUri;
use randtext_data::{BackoffStrategy, FetchPolicy, RetryPolicy, TimeoutConfig};
use randtext_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where random text comes from.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Retry and timeout settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Problems that would make commands fail at runtime.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.fetch.attempts == 0 {
            errors.push("fetch.attempts must be at least 1".to_string());
        }
        if self.fetch.timeout_ms == 0 {
            errors.push("fetch.timeout_ms must be positive".to_string());
        }
        if self.fetch.default_length == 0 {
            errors.push("fetch.default_length must be positive".to_string());
        }
        if self.provider.kind == ProviderKind::Http && self.provider.endpoint.is_none() {
            errors.push("provider.endpoint is required when provider.kind = \"http\"".to_string());
        }
        if self.store.path.is_empty() {
            errors.push("store.path must not be empty".to_string());
        }

        errors
    }
}

/// Provider implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Generate text in-process.
    #[default]
    Local,
    /// Query an HTTP endpoint.
    Http,
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Resource to query.
    #[serde(default)]
    pub uri: ContentUri,

    /// Base URL for the HTTP provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Total tries per fetch.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Wait before the second try; doubles after each failure.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Limit for a single try.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Length used when a command doesn't give one.
    #[serde(default = "default_length")]
    pub default_length: u32,
}

fn default_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    400
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_length() -> u32 {
    16
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay_ms(),
            timeout_ms: default_timeout_ms(),
            default_length: default_length(),
        }
    }
}

impl FetchConfig {
    /// Build the fetch client policy.
    pub fn policy(&self) -> FetchPolicy {
        let retry = RetryPolicy::new(self.attempts).with_backoff(BackoffStrategy::exponential(
            Duration::from_millis(self.base_delay_ms),
        ));
        FetchPolicy::new(
            TimeoutConfig::from_total(Duration::from_millis(self.timeout_ms)),
            retry,
        )
    }
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file, relative to the working directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "randtext.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Generate a default randtext.toml config file.
pub fn generate_default_config() -> String {
    r#"# randtext configuration

[provider]
kind = "local"
uri = "content://com.iav.contestdataprovider/text"
# kind = "http"
# endpoint = "http://localhost:8080/text"

[fetch]
attempts = 3
base_delay_ms = 400
timeout_ms = 5000
default_length = 16

[store]
path = "randtext.db"

[logging]
level = "info"
format = "human"
"#
    .to_string()
}
