//! randtext - fetch random text from a provider and keep it in a local store.
//!
//! Commands:
//! - `randtext generate` - Fetch and store random text
//! - `randtext list` - List stored texts
//! - `randtext delete` - Delete one text
//! - `randtext clear` - Delete every text
//! - `randtext watch` - Follow the stored list live
//! - `randtext config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ClearArgs, ConfigArgs, DeleteArgs, GenerateArgs, ListArgs, WatchArgs};

/// randtext - Fetch, store and browse random text
#[derive(Parser)]
#[command(name = "randtext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch random text and store it
    Generate(GenerateArgs),

    /// List stored texts, newest first
    List(ListArgs),

    /// Delete one stored text
    Delete(DeleteArgs),

    /// Delete every stored text
    Clear(ClearArgs),

    /// Print the stored list whenever it changes
    Watch(WatchArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = randtext_observability::init(&ctx.logging(cli.verbose, cli.json)) {
        ctx.output.warn(&e.to_string());
    }

    // Execute command
    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, &ctx).await,
        Commands::List(args) => commands::list::run(args, &ctx).await,
        Commands::Delete(args) => commands::delete::run(args, &ctx).await,
        Commands::Clear(args) => commands::clear::run(args, &ctx).await,
        Commands::Watch(args) => commands::watch::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
