//! Recently searched terms.

use storefront_cache::{Cache, KeyValueStore};

use crate::config::SuggestConfig;

/// Bounded, most-recent-first list of past search terms, persisted as a
/// JSON array under a fixed key after every change.
///
/// Storage failures never surface: unreadable data loads as an empty list
/// and failed writes are logged.
#[derive(Debug)]
pub struct RecentSearchStore<S> {
    cache: Cache<S>,
    key: String,
    limit: usize,
    entries: Vec<String>,
}

impl<S: KeyValueStore> RecentSearchStore<S> {
    /// Open the list with the default key and limit.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &SuggestConfig::default())
    }

    /// Open the list using the key and limit from `config`.
    pub fn with_config(store: S, config: &SuggestConfig) -> Self {
        let mut recents = Self {
            cache: Cache::new(store),
            key: config.recent_key.clone(),
            limit: config.recent_limit.max(1),
            entries: Vec::new(),
        };
        recents.load();
        recents
    }

    /// Re-read the persisted list.
    pub fn load(&mut self) -> Vec<String> {
        let stored = match self.cache.get::<Vec<String>>(&self.key) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring unreadable recent searches");
                Vec::new()
            }
        };

        let mut entries: Vec<String> = Vec::with_capacity(self.limit);
        for term in stored {
            let term = term.trim();
            if !term.is_empty() && !entries.iter().any(|e| e == term) {
                entries.push(term.to_string());
            }
        }
        entries.truncate(self.limit);

        self.entries = entries;
        self.entries.clone()
    }

    /// Move `term` to the front, dropping the oldest entry past the limit.
    /// Blank terms are ignored.
    pub fn record_search(&mut self, term: &str) -> Vec<String> {
        let term = term.trim();
        if term.is_empty() {
            return self.entries.clone();
        }

        self.entries.retain(|e| e != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(self.limit);
        self.persist();
        self.entries.clone()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.cache.delete(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "failed to clear recent searches");
        }
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.cache.set(&self.key, &self.entries) {
            tracing::warn!(key = %self.key, error = %e, "failed to save recent searches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_cache::{CacheError, MemoryStore};

    #[test]
    fn test_dedupe_moves_to_front() {
        let mut recents = RecentSearchStore::new(MemoryStore::new());
        recents.record_search("phone");
        recents.record_search("charger");
        let list = recents.record_search("phone");
        assert_eq!(list, vec!["phone", "charger"]);
    }

    #[test]
    fn test_never_exceeds_limit() {
        let mut recents = RecentSearchStore::new(MemoryStore::new());
        for i in 0..20 {
            let list = recents.record_search(&format!("term {}", i));
            assert!(list.len() <= 5);
        }
        assert_eq!(
            recents.entries(),
            &["term 19", "term 18", "term 17", "term 16", "term 15"]
        );
    }

    #[test]
    fn test_blank_terms_ignored_and_trimmed() {
        let mut recents = RecentSearchStore::new(MemoryStore::new());
        assert!(recents.record_search("   ").is_empty());
        recents.record_search("  rice  ");
        assert_eq!(recents.record_search("rice"), vec!["rice"]);
    }

    #[test]
    fn test_persisted_and_reloaded() {
        let store = Arc::new(MemoryStore::new());
        let mut recents = RecentSearchStore::new(Arc::clone(&store));
        recents.record_search("laptop");
        recents.record_search("bag");

        assert_eq!(
            store.get("recentSearches").unwrap().as_deref(),
            Some(r#"["bag","laptop"]"#)
        );

        let reopened = RecentSearchStore::new(store);
        assert_eq!(reopened.entries(), &["bag", "laptop"]);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let store = MemoryStore::new();
        store.set("recentSearches", "{\"oops\":").unwrap();
        let mut recents = RecentSearchStore::new(store);
        assert!(recents.is_empty());

        recents.record_search("fan");
        assert_eq!(recents.entries(), &["fan"]);
    }

    #[test]
    fn test_oversized_persisted_list_is_trimmed() {
        let store = MemoryStore::new();
        store
            .set("recentSearches", r#"["a","b","a"," ","c","d","e","f","g"]"#)
            .unwrap();
        let recents = RecentSearchStore::new(store);
        assert_eq!(recents.entries(), &["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_clear() {
        let store = Arc::new(MemoryStore::new());
        let mut recents = RecentSearchStore::new(Arc::clone(&store));
        recents.record_search("x");
        recents.clear();
        assert!(recents.is_empty());
        assert_eq!(store.get("recentSearches").unwrap(), None);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::StoreError("offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError("offline".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError("offline".to_string()))
        }
    }

    #[test]
    fn test_storage_failures_do_not_surface() {
        let mut recents = RecentSearchStore::new(BrokenStore);
        assert!(recents.is_empty());
        assert_eq!(recents.record_search("kettle"), vec!["kettle"]);
        recents.clear();
    }
}
