//! CLI command implementations.

pub mod filter;
pub mod price;
pub mod recent;
pub mod search;
pub mod suggest;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use storefront_search::search::{FilterState, DEFAULT_PAGE_SIZE};

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    #[command(subcommand)]
    pub command: PriceCommand,
}

#[derive(Subcommand)]
pub enum PriceCommand {
    /// Parse a label such as "₦5,000 - ₦10,000" or "₦50,000+".
    Parse {
        /// Price-range label.
        label: String,
    },
    /// Format a bound as a label.
    Format {
        /// Lower bound.
        min: u64,
        /// Upper bound (omit for no limit).
        max: Option<u64>,
    },
    /// Snap raw slider positions to a bound.
    Slider {
        /// Lower handle position.
        min: f64,
        /// Upper handle position.
        max: f64,
    },
    /// List dropdown labels for a set of breakpoints.
    Presets {
        /// Ascending breakpoints.
        #[arg(value_delimiter = ',', default_value = "5000,10000,20000,50000")]
        breakpoints: Vec<u64>,
    },
}

/// Sidebar filter flags shared by `filter` and `search`.
#[derive(Args, Default)]
pub struct FilterOpts {
    /// Category name ("All" for any).
    #[arg(long)]
    pub category: Option<String>,

    /// Brand name ("All" for any).
    #[arg(long)]
    pub brand: Option<String>,

    /// Price-range label.
    #[arg(long)]
    pub price: Option<String>,

    /// Only items in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Minimum star rating (0-5).
    #[arg(long)]
    pub min_rating: Option<u8>,

    /// Start from a filter state in the storefront's JSON shape.
    #[arg(long, value_name = "JSON")]
    pub state: Option<String>,
}

impl FilterOpts {
    /// Build the filter state, applying flags over `--state`.
    pub fn to_state(&self) -> Result<FilterState> {
        let mut state = match &self.state {
            Some(raw) => serde_json::from_str(raw).context("Invalid --state JSON")?,
            None => FilterState::default(),
        };

        if let Some(category) = &self.category {
            state = state.with_category(category.as_str());
        }
        if let Some(brand) = &self.brand {
            state = state.with_brand(brand.as_str());
        }
        if let Some(price) = &self.price {
            state = state.with_price(price.as_str());
        }
        if self.in_stock {
            state = state.with_in_stock(true);
        }
        if let Some(rating) = self.min_rating {
            state = state.with_min_rating(rating);
        }

        Ok(state)
    }
}

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub filters: FilterOpts,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text.
    #[arg(default_value = "")]
    pub text: String,

    #[command(flatten)]
    pub filters: FilterOpts,

    /// Page to fetch (0-indexed).
    #[arg(short, long, default_value = "0")]
    pub page: u32,

    /// Results per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Sort order: relevance, price_asc, price_desc, rating, newest.
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Don't add the text to recent searches.
    #[arg(long)]
    pub no_record: bool,
}

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Text to type, one keystroke at a time.
    pub text: String,

    /// Milliseconds between keystrokes.
    #[arg(long, default_value = "60")]
    pub keystroke_ms: u64,

    /// Arrow down to this row (0-indexed) and press Enter.
    #[arg(long)]
    pub select: Option<usize>,

    /// Press Enter after typing.
    #[arg(long)]
    pub enter: bool,
}

/// Arguments for the recent command.
#[derive(Args)]
pub struct RecentArgs {
    #[command(subcommand)]
    pub command: Option<RecentCommand>,
}

#[derive(Subcommand)]
pub enum RecentCommand {
    /// List recent searches.
    List,
    /// Record a search term.
    Add {
        /// Search term.
        term: String,
    },
    /// Forget all recent searches.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}
