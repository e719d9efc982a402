//! Search-box autocomplete for the storefront.
//!
//! Keystrokes are debounced into catalogue lookups, late responses are
//! dropped, and past searches are kept in a small persisted list that shows
//! under the product suggestions.
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_cache::MemoryStore;
//! use storefront_search::search::SearchBackend;
//! use storefront_suggest::prelude::*;
//!
//! # async fn demo(backend: Arc<dyn SearchBackend>) {
//! let recents = RecentSearchStore::new(MemoryStore::new());
//! let engine = SuggestionEngine::new(backend, recents, SuggestConfig::default());
//!
//! engine.input("head");
//! engine.handle_key(NavKey::ArrowDown);
//! if let Some(commit) = engine.handle_key(NavKey::Enter) {
//!     println!("search for {}", commit.term);
//! }
//! # }
//! ```

pub mod config;
pub mod debounce;
pub mod engine;
pub mod item;
pub mod recent;

pub use config::SuggestConfig;
pub use debounce::Debouncer;
pub use engine::{
    Commit, CommitSource, Entry, NavKey, Phase, SuggestionEngine, SuggestionView,
};
pub use item::{to_suggestion_item, SuggestionItem};
pub use recent::RecentSearchStore;

pub mod prelude {
    pub use crate::config::SuggestConfig;
    pub use crate::engine::{Commit, CommitSource, NavKey, Phase, SuggestionEngine};
    pub use crate::item::SuggestionItem;
    pub use crate::recent::RecentSearchStore;
}
