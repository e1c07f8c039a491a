//! Follow the stored list live.

use std::time::Duration;

use anyhow::{bail, Result};
use randtext_sdk::TextSession;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, Interval, MissedTickBehavior};

use super::WatchArgs;
use crate::context::Context;

/// Run the watch command.
pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let length = ctx.length_or_default(args.length);
    let mut ticker = match args.every {
        Some(0) => bail!("--every must be at least 1 second"),
        Some(secs) => {
            let mut ticker = interval(Duration::from_secs(secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        }
        None => None,
    };

    let session = TextSession::new(ctx.repository().await?);
    let mut texts = session.all_texts();
    let mut notifications = session.notifications();
    let mut loading = session.loading();

    ctx.output.info("Watching stored texts. Press Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = texts.changed() => {
                if changed.is_err() {
                    break;
                }
                let records = texts.borrow_and_update().clone();
                ctx.output.header(&format!("{} stored texts", records.len()));
                ctx.output.records(&records);
            }
            message = notifications.recv() => match message {
                Ok(message) => ctx.output.warn(&message),
                Err(RecvError::Lagged(skipped)) => {
                    ctx.output.debug(&format!("Skipped {} notifications", skipped));
                }
                Err(RecvError::Closed) => break,
            },
            Ok(()) = loading.changed() => {
                if *loading.borrow_and_update() {
                    ctx.output.debug("Fetching...");
                }
            }
            _ = next_tick(&mut ticker) => {
                session.generate_random(length);
            }
        }
    }

    ctx.output.info("Stopped");
    Ok(())
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
