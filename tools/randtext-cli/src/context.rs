//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use randtext_data::providers::{HttpProvider, LocalTextProvider};
use randtext_data::{FetchClient, Provider};
use randtext_db::TextStore;
use randtext_observability::{LogFormat, LoggingConfig};
use randtext_sdk::TextRepository;

use crate::config::{CliConfig, ProviderKind};
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["randtext.toml", ".randtext.toml", "randtext.json"];

/// Provider chosen at runtime from the config.
pub type DynProvider = Box<dyn Provider>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Logger settings after command-line overrides.
    pub fn logging(&self, verbose: bool, json: bool) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if verbose {
            logging.level = logging.level.raised_by(1);
        }
        if json {
            logging.format = LogFormat::Json;
        }
        logging
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Length to use when a command doesn't give one.
    pub fn length_or_default(&self, length: Option<u32>) -> u32 {
        length.unwrap_or(self.config.fetch.default_length)
    }

    /// Open the configured record store.
    pub async fn store(&self) -> Result<TextStore> {
        let path = self.resolve_path(&self.config.store.path);
        self.output.debug(&format!("Store: {}", path.display()));
        TextStore::connect(&path)
            .await
            .with_context(|| format!("Failed to open store: {}", path.display()))
    }

    /// Build the configured provider.
    pub fn provider(&self) -> Result<DynProvider> {
        let provider = &self.config.provider;
        match provider.kind {
            ProviderKind::Local => Ok(Box::new(
                LocalTextProvider::new()
                    .with_authority(provider.uri.authority())
                    .with_default_length(self.config.fetch.default_length),
            )),
            ProviderKind::Http => {
                let Some(endpoint) = provider.endpoint.as_deref() else {
                    bail!("provider.endpoint is required when provider.kind = \"http\"");
                };
                let timeouts = self.config.fetch.policy().timeout;
                let http = HttpProvider::new(endpoint, &timeouts)
                    .context("Failed to create HTTP provider")?;
                Ok(Box::new(http))
            }
        }
    }

    /// Fetch client plus store, wired from the config.
    pub async fn repository(&self) -> Result<TextRepository<DynProvider>> {
        let client = FetchClient::new(self.provider()?)
            .with_uri(self.config.provider.uri.clone())
            .with_policy(self.config.fetch.policy());
        self.output.debug(&format!("Provider: {}", client.uri()));

        Ok(TextRepository::new(client, self.store().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("randtext.toml"),
            "[fetch]\ndefault_length = 7\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = Context::find_config(&nested).unwrap();
        assert_eq!(path, dir.path().join("randtext.toml"));
        assert_eq!(config.fetch.default_length, 7);
    }

    #[test]
    fn test_logging_overrides() {
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, false),
            cwd: PathBuf::from("/tmp"),
        };

        let logging = ctx.logging(true, true);
        assert_eq!(logging.level, randtext_observability::LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(ctx.resolve_path("x.db"), PathBuf::from("/tmp/x.db"));
    }

    #[tokio::test]
    async fn test_store_opens_relative_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, false),
            cwd: dir.path().to_path_buf(),
        };

        let store = ctx.store().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(dir.path().join("randtext.db").exists());
    }
}
