//! Product search command.

use anyhow::{Context as _, Result};
use serde_json::json;
use storefront_search::search::{SearchRequest, SortOption};
use storefront_suggest::{to_suggestion_item, SuggestionItem};

use super::SearchArgs;
use crate::context::Context;
use crate::output::truncate;

const PAGER_WIDTH: usize = 7;
const COLUMNS: [usize; 4] = [12, 36, 12, 16];

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let client = ctx.index_client()?;
    let state = args.filters.to_state()?;
    let request = SearchRequest::new(args.text.trim())
        .with_filters(&ctx.compiler(), &state)
        .with_sort(SortOption::from_key(&args.sort))
        .with_pagination(args.page, args.page_size);

    ctx.output.debug(&format!("POST {}", client.endpoint(&request)));
    if let Some(expression) = &request.filter_expression {
        ctx.output.debug(&format!("filters: {}", expression));
    }

    let spinner = ctx.output.spinner("Searching...");
    let results = client.query(&request).await;
    spinner.finish_and_clear();
    let results = results.context("Search failed")?;

    if !args.no_record && !request.text.is_empty() {
        ctx.recents()?.record_search(&request.text);
    }

    let pagination = results.pagination();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "request": request,
            "results": results,
            "pagination": pagination,
        }));
        return Ok(());
    }

    let title = if request.text.is_empty() {
        format!("{} products", results.total_count)
    } else {
        format!("{} results for \"{}\"", results.total_count, request.text)
    };
    ctx.output.header(&title);
    ctx.output.kv("sort", request.sort.display_name());

    if results.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    let currency = ctx.config.price.currency;
    let rows: Vec<SuggestionItem> = results.items.iter().filter_map(to_suggestion_item).collect();
    let skipped = results.len() - rows.len();

    println!();
    ctx.output.table_row(&["ID", "NAME", "PRICE", "CATEGORY"], &COLUMNS);
    for item in &rows {
        let id = truncate(&item.id, 12);
        let name = truncate(&item.name, 36);
        let price = item.display_price(currency);
        ctx.output.table_row(
            &[&id, &name, &price, item.category.as_deref().unwrap_or("-")],
            &COLUMNS,
        );
    }
    if skipped > 0 {
        ctx.output.warn(&format!("{} hits had no usable id or name", skipped));
    }

    let pages: Vec<String> = pagination
        .page_numbers(PAGER_WIDTH)
        .into_iter()
        .map(|p| if p == pagination.page { format!("[{}]", p) } else { p.to_string() })
        .collect();
    println!();
    ctx.output.kv(
        "page",
        &format!("{} of {}  {}", pagination.page + 1, pagination.total_pages, pages.join(" ")),
    );
    if pagination.has_next {
        ctx.output.info(&format!("Next page: --page {}", pagination.page + 1));
    }
    Ok(())
}
