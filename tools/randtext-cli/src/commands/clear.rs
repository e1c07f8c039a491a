//! Delete every stored text.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;

use super::ClearArgs;
use crate::context::Context;

/// Run the clear command.
pub async fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store().await?;
    let count = store.snapshot().len();

    if count == 0 && !ctx.output.is_json() {
        ctx.output.info("Nothing to delete");
        return Ok(());
    }

    if !args.yes {
        if ctx.output.is_json() {
            bail!("Refusing to prompt in JSON mode. Pass --yes to confirm.");
        }

        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all {} stored texts?", count))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    let removed = store.delete_all().await.context("Failed to delete all")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "deleted": removed }));
    } else {
        ctx.output.success(&format!("Deleted {} texts", removed));
    }

    Ok(())
}
