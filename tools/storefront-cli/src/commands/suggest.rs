//! Autocomplete replay command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use storefront_cache::KeyValueStore;
use storefront_search::search::SearchBackend;
use storefront_suggest::{Entry, NavKey, Phase, SuggestionEngine, SuggestionView};
use tokio::time::sleep;

use super::SuggestArgs;
use crate::context::Context;

const POLL: Duration = Duration::from_millis(25);

/// Run the suggest command.
pub async fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let backend: Arc<dyn SearchBackend> = Arc::new(ctx.index_client()?);
    let recents = ctx.recents()?;
    let config = ctx.config.suggest.clone();
    let engine = SuggestionEngine::new(backend, recents, config);

    engine.focus();
    let mut typed = String::new();
    for ch in args.text.chars() {
        typed.push(ch);
        engine.input(&typed);
        ctx.output.debug(&format!("typed {:?} ({:?})", typed, engine.phase()));
        sleep(Duration::from_millis(args.keystroke_ms)).await;
    }

    if !settle(&engine, settle_deadline(ctx)).await {
        ctx.output.warn("Suggestions did not arrive in time");
    }

    let commit = match args.select {
        Some(row) => {
            for _ in 0..=row {
                engine.handle_key(NavKey::ArrowDown);
            }
            engine.handle_key(NavKey::Enter)
        }
        None if args.enter => engine.handle_key(NavKey::Enter),
        None => None,
    };

    let view = engine.view();
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "view": view, "commit": commit }));
        return Ok(());
    }

    match commit {
        Some(commit) => ctx.output.success(&format!("Search for \"{}\"", commit.term)),
        None => show_view(&view, ctx),
    }
    Ok(())
}

/// Upper bound on how long a debounced fetch can take to land.
fn settle_deadline(ctx: &Context) -> Duration {
    let attempts = u64::from(ctx.config.search.max_retries) + 1;
    ctx.config.suggest.debounce() + Duration::from_millis(ctx.config.search.timeout_ms * attempts) + Duration::from_secs(1)
}

async fn settle<S: KeyValueStore + Send + 'static>(engine: &SuggestionEngine<S>, deadline: Duration) -> bool {
    let wait = async {
        while engine.phase() == Phase::Pending {
            sleep(POLL).await;
        }
    };
    tokio::time::timeout(deadline, wait).await.is_ok()
}

fn show_view(view: &SuggestionView, ctx: &Context) {
    let currency = ctx.config.price.currency;

    ctx.output.header(&format!("Suggestions for \"{}\"", view.query.trim()));
    if view.suggestions.is_empty() {
        let reason = match view.phase {
            Phase::Idle => "Type at least a couple of characters.",
            _ => "No matching products.",
        };
        ctx.output.info(reason);
    }

    for (index, entry) in view.entries().enumerate() {
        let selected = view.selected == Some(index);
        match entry {
            Entry::Suggestion(item) => ctx.output.choice(
                index,
                &format!("{}  {}", item.name, item.display_price(currency)),
                selected,
            ),
            Entry::Recent(term) => ctx.output.choice(index, &format!("↺ {}", term), selected),
        }
    }
}
