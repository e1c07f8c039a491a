//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, ProviderKind};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[provider]");
    let kind = match config.provider.kind {
        ProviderKind::Local => "local",
        ProviderKind::Http => "http",
    };
    ctx.output.kv("kind", kind);
    ctx.output.kv("uri", &config.provider.uri.to_string());
    if let Some(ref endpoint) = config.provider.endpoint {
        ctx.output.kv("endpoint", endpoint);
    }

    ctx.output.info("[fetch]");
    ctx.output.kv("attempts", &config.fetch.attempts.to_string());
    ctx.output.kv("base_delay_ms", &config.fetch.base_delay_ms.to_string());
    ctx.output.kv("timeout_ms", &config.fetch.timeout_ms.to_string());
    ctx.output.kv("default_length", &config.fetch.default_length.to_string());

    ctx.output.info("[store]");
    ctx.output.kv(
        "path",
        &ctx.resolve_path(&config.store.path).display().to_string(),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level.to_string());
    ctx.output.kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let errors = ctx.config.validate();
    if errors.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    bail!("Configuration has {} error(s)", errors.len())
}
