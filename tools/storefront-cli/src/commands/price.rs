//! Price-range label commands.

use anyhow::Result;
use serde::Serialize;
use storefront_search::search::Filter;
use storefront_search::{PriceBound, PriceRangeCodec};

use super::{PriceArgs, PriceCommand};
use crate::context::Context;

#[derive(Serialize)]
struct BoundReport {
    label: String,
    min: u64,
    max: Option<u64>,
    filter: Option<String>,
}

impl BoundReport {
    fn new(codec: &PriceRangeCodec, bound: PriceBound) -> Self {
        Self {
            label: codec.format(&bound),
            min: bound.min,
            max: bound.max,
            filter: (!bound.is_all()).then(|| Filter::Price(bound).to_expression()),
        }
    }
}

/// Run the price command.
pub async fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let codec = ctx.codec();
    match args.command {
        PriceCommand::Parse { label } => show_bound(&codec, codec.parse(&label), ctx),
        PriceCommand::Format { min, max } => show_bound(&codec, PriceBound::new(min, max), ctx),
        PriceCommand::Slider { min, max } => show_bound(&codec, codec.from_slider(min, max), ctx),
        PriceCommand::Presets { breakpoints } => show_presets(&codec, &breakpoints, ctx),
    }
}

fn show_bound(codec: &PriceRangeCodec, bound: PriceBound, ctx: &Context) -> Result<()> {
    let report = BoundReport::new(codec, bound);

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    let currency = codec.config().currency;
    ctx.output.header(&report.label);
    ctx.output.kv("min", &currency.display(report.min));
    ctx.output.kv(
        "max",
        &report
            .max
            .map(|max| currency.display(max))
            .unwrap_or_else(|| "no limit".to_string()),
    );
    ctx.output.kv("filter", report.filter.as_deref().unwrap_or("(none)"));
    Ok(())
}

fn show_presets(codec: &PriceRangeCodec, breakpoints: &[u64], ctx: &Context) -> Result<()> {
    let labels = codec.presets(breakpoints);

    if ctx.output.is_json() {
        ctx.output.json(&labels);
        return Ok(());
    }

    ctx.output.header("Price ranges");
    for label in &labels {
        ctx.output.list_item(label);
    }
    Ok(())
}
