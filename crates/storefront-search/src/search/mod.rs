//! Search module.
//!
//! Filter compilation, request building, result pages and the backend seam.

mod backend;
mod filter;
mod query;
mod results;

pub use backend::SearchBackend;
pub use filter::{Filter, FilterCompiler, FilterState, PriceSelection, MAX_RATING};
pub use query::{SearchRequest, SortOption, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use results::{Pagination, ResultPage};
