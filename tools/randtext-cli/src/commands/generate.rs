//! Fetch and store random text.

use anyhow::{Context as _, Result};

use super::GenerateArgs;
use crate::context::Context;

/// Run the generate command.
pub async fn run(args: GenerateArgs, ctx: &Context) -> Result<()> {
    let length = ctx.length_or_default(args.length);
    let repository = ctx.repository().await?;

    let mut created = Vec::with_capacity(args.count);
    for i in 0..args.count {
        let spinner = ctx
            .output
            .spinner(&format!("Fetching random text ({}/{})", i + 1, args.count));
        let result = repository.generate_random(length).await;
        spinner.finish_and_clear();

        let record = result.context("Failed")?;
        ctx.output
            .success(&format!("Stored #{} ({} chars)", record.id, record.length));
        ctx.output.kv("value", &record.value);
        created.push(record);
    }

    if ctx.output.is_json() {
        ctx.output.json(&created);
    }

    Ok(())
}
