//! Recent-search commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;

use super::{RecentArgs, RecentCommand};
use crate::context::Context;

/// Run the recent command.
pub async fn run(args: RecentArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(RecentCommand::List) | None => list_recent(ctx),
        Some(RecentCommand::Add { term }) => add_recent(&term, ctx),
        Some(RecentCommand::Clear { yes }) => clear_recent(yes, ctx),
    }
}

fn list_recent(ctx: &Context) -> Result<()> {
    let recents = ctx.recents()?;

    if ctx.output.is_json() {
        ctx.output.json(&recents.entries());
        return Ok(());
    }

    ctx.output.header("Recent searches");
    if recents.is_empty() {
        ctx.output.info("No recent searches.");
        return Ok(());
    }
    for (index, term) in recents.entries().iter().enumerate() {
        ctx.output.choice(index, term, false);
    }
    Ok(())
}

fn add_recent(term: &str, ctx: &Context) -> Result<()> {
    let mut recents = ctx.recents()?;
    let entries = recents.record_search(term);

    if ctx.output.is_json() {
        ctx.output.json(&entries);
        return Ok(());
    }

    if term.trim().is_empty() {
        ctx.output.warn("Blank search terms are not recorded");
    } else {
        ctx.output.success(&format!("Recorded \"{}\"", term.trim()));
    }
    for term in &entries {
        ctx.output.list_item(term);
    }
    Ok(())
}

fn clear_recent(yes: bool, ctx: &Context) -> Result<()> {
    let mut recents = ctx.recents()?;

    if recents.is_empty() {
        ctx.output.info("No recent searches to clear.");
        return Ok(());
    }

    if !yes {
        if ctx.output.is_json() {
            bail!("Refusing to clear without --yes in JSON mode");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Forget {} recent searches?", recents.len()))
            .default(false)
            .interact()
            .context("Confirmation prompt failed (pass --yes when not on a terminal)")?;

        if !confirmed {
            ctx.output.warn("Nothing cleared");
            return Ok(());
        }
    }

    recents.clear();
    if ctx.output.is_json() {
        ctx.output.json(&recents.entries());
    } else {
        ctx.output.success(&format!("Cleared {}", ctx.recent_path().display()));
    }
    Ok(())
}
