//! Delete one stored text.

use anyhow::{Context as _, Result};

use super::DeleteArgs;
use crate::context::Context;

/// Run the delete command.
pub async fn run(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store().await?;
    let removed = store.delete(args.id).await.context("Failed to delete")?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "id": args.id, "deleted": removed }));
    } else if removed {
        ctx.output.success(&format!("Deleted #{}", args.id));
    } else {
        ctx.output.warn(&format!("No text with id {}", args.id));
    }

    Ok(())
}
