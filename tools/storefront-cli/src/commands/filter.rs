//! Filter compilation command.

use anyhow::Result;
use serde_json::json;
use storefront_search::search::Filter;

use super::FilterArgs;
use crate::context::Context;

/// Run the filter command.
pub async fn run(args: FilterArgs, ctx: &Context) -> Result<()> {
    let state = args.filters.to_state()?;
    let compiler = ctx.compiler();
    let clauses: Vec<String> = compiler.filters(&state).iter().map(Filter::to_expression).collect();
    let expression = compiler.compile(&state);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "state": state,
            "clauses": clauses,
            "expression": expression,
        }));
        return Ok(());
    }

    let codec = ctx.codec();
    ctx.output.header("Filters");
    ctx.output.kv("category", &state.category);
    ctx.output.kv("brand", &state.brand);
    ctx.output.kv("price", &codec.format(&state.price_range.resolve(&codec)));
    ctx.output.kv("in stock", &state.in_stock.to_string());
    ctx.output.kv("min rating", &state.min_rating.to_string());

    ctx.output.header("Expression");
    match expression {
        Some(expression) => {
            for clause in &clauses {
                ctx.output.list_item(clause);
            }
            println!("\n{}", expression);
        }
        None => ctx.output.info("No active filters; the filter parameter is omitted."),
    }
    Ok(())
}
