//! Autocomplete tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the search-box autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestConfig {
    /// Quiet period after the last keystroke before fetching.
    pub debounce_ms: u64,
    /// Shortest trimmed query that triggers a fetch.
    pub min_query_chars: usize,
    /// Product suggestions requested per fetch.
    pub max_suggestions: u32,
    /// Recent searches kept.
    pub recent_limit: usize,
    /// Storage key for the recent-search list.
    pub recent_key: String,
    /// Delay before a blur hides the list, so a click on an entry lands first.
    pub blur_grace_ms: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
            max_suggestions: 5,
            recent_limit: 5,
            recent_key: "recentSearches".to_string(),
            blur_grace_ms: 200,
        }
    }
}

impl SuggestConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}
