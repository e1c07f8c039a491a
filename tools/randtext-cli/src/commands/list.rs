//! List stored texts.

use anyhow::Result;

use super::ListArgs;
use crate::context::Context;

/// Run the list command.
pub async fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store().await?;
    let mut records = store.list_all().await?;
    let total = records.len();
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if records.is_empty() && !ctx.output.is_json() {
        ctx.output.info("No texts stored. Run `randtext generate` to fetch one.");
        return Ok(());
    }

    ctx.output.header(&format!("Stored texts ({} of {})", records.len(), total));
    ctx.output.records(&records);

    Ok(())
}
