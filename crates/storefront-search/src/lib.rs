//! Search query construction for the campus storefront.
//!
//! This crate turns what the shopper picked in the filter sidebar into
//! what the hosted search index understands:
//!
//! - **Price**: price-range labels (`"₦10,000 - ₦15,000"`) to numeric bounds and back
//! - **Filters**: sidebar state compiled into a filter expression
//! - **Search**: request builder, result pages, pagination, the backend trait
//!
//! # Example
//!
//! ```rust
//! use storefront_search::prelude::*;
//!
//! let state = FilterState::default()
//!     .with_category("Books")
//!     .with_in_stock(true)
//!     .with_min_rating(3);
//!
//! let request = SearchRequest::new("calculus")
//!     .with_filter_state(&state)
//!     .with_pagination(0, 20);
//!
//! assert_eq!(
//!     request.filter_expression.as_deref(),
//!     Some("category:\"Books\" AND stockQuantity > 0 AND rating >= 3"),
//! );
//! ```

pub mod error;
pub mod money;
pub mod price;
pub mod search;

pub use error::SearchError;
pub use money::Currency;
pub use price::{PriceBound, PriceConfig, PriceRangeCodec};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::SearchError;
    pub use crate::money::Currency;
    pub use crate::price::{PriceBound, PriceConfig, PriceRangeCodec};
    pub use crate::search::{
        Filter, FilterCompiler, FilterState, Pagination, PriceSelection, ResultPage,
        SearchBackend, SearchRequest, SortOption,
    };
}
