//! Search request builder.

use serde::{Deserialize, Serialize};

use crate::search::{FilterCompiler, FilterState};

/// Default number of hits per results page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the index service will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort options for search results.
///
/// The index service sorts through replica indexes, so every option other
/// than relevance names a replica suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Index ranking (default).
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by highest rated.
    Rating,
    /// Sort by newest listing first.
    Newest,
}

impl SortOption {
    /// Replica index suffix, or `None` for the primary index.
    pub fn replica_suffix(&self) -> Option<&'static str> {
        match self {
            SortOption::Relevance => None,
            SortOption::PriceAsc => Some("price_asc"),
            SortOption::PriceDesc => Some("price_desc"),
            SortOption::Rating => Some("rating_desc"),
            SortOption::Newest => Some("newest"),
        }
    }

    /// Index to query for this sort order.
    pub fn index_name(&self, primary: &str) -> String {
        match self.replica_suffix() {
            Some(suffix) => format!("{}_{}", primary, suffix),
            None => primary.to_string(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Rating => "Highest Rated",
            SortOption::Newest => "Newest",
        }
    }

    /// Parse a sort key as used in page URLs (`price_asc`, `rating`, ...).
    pub fn from_key(key: &str) -> Self {
        match key {
            "price_asc" => SortOption::PriceAsc,
            "price_desc" => SortOption::PriceDesc,
            "rating" => SortOption::Rating,
            "newest" => SortOption::Newest,
            _ => SortOption::Relevance,
        }
    }
}

/// A request to the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// Free text.
    pub text: String,
    /// Compiled filter expression. `None` means the parameter is omitted.
    pub filter_expression: Option<String>,
    /// Page number (0-indexed).
    pub page: u32,
    /// Hits per page.
    pub page_size: u32,
    /// Sort option.
    pub sort: SortOption,
}

impl SearchRequest {
    /// Create a request for the first page of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filter_expression: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortOption::Relevance,
        }
    }

    /// Attach a pre-compiled filter expression. Blank expressions are dropped.
    pub fn with_filter_expression(mut self, expression: Option<String>) -> Self {
        self.filter_expression = expression.filter(|e| !e.trim().is_empty());
        self
    }

    /// Compile and attach the sidebar filters.
    pub fn with_filter_state(self, state: &FilterState) -> Self {
        self.with_filters(&FilterCompiler::default(), state)
    }

    /// Compile and attach the sidebar filters with a specific compiler.
    pub fn with_filters(self, compiler: &FilterCompiler, state: &FilterState) -> Self {
        let expression = compiler.compile(state);
        self.with_filter_expression(expression)
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Index of the first hit on the requested page.
    pub fn offset(&self) -> u64 {
        self.page as u64 * self.page_size as u64
    }
}
