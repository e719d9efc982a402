//! Search-box autocomplete state machine.
//!
//! ```text
//! Idle ──keystroke (≥ min chars)──▶ Pending ──fetch resolves──▶ Showing
//!  ▲                                  │  ▲                          │
//!  └──── clear / escape / blur ◀──────┘  └──────── keystroke ◀──────┘
//! ```
//!
//! Fetches are debounced, and every resolution is checked against the query
//! that is current when it lands: a response for `"ab"` arriving after the
//! shopper has typed `"abc"` is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use storefront_cache::KeyValueStore;
use storefront_search::search::{SearchBackend, SearchRequest};

use crate::config::SuggestConfig;
use crate::debounce::Debouncer;
use crate::item::{to_suggestion_item, SuggestionItem};
use crate::recent::RecentSearchStore;

/// Where the input session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Query too short or list dismissed; no product suggestions.
    Idle,
    /// A fetch is scheduled or in flight.
    Pending,
    /// Suggestions for the current query are listed.
    Showing,
}

/// Keys the dropdown reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// What a committed term came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum CommitSource {
    /// A product suggestion.
    Suggestion(SuggestionItem),
    /// A recent search.
    Recent,
    /// Whatever was typed.
    Text,
}

/// A term the shopper chose to search for. The caller runs the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub term: String,
    pub source: CommitSource,
}

/// One row of the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Suggestion(&'a SuggestionItem),
    Recent(&'a str),
}

/// Everything the dropdown needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionView {
    pub query: String,
    pub phase: Phase,
    pub open: bool,
    pub suggestions: Vec<SuggestionItem>,
    pub recents: Vec<String>,
    /// Index into suggestions followed by recents. `None` means no selection.
    pub selected: Option<usize>,
}

impl SuggestionView {
    /// Rows in display order: product suggestions, then recent searches.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.suggestions
            .iter()
            .map(Entry::Suggestion)
            .chain(self.recents.iter().map(|r| Entry::Recent(r.as_str())))
    }

    pub fn selected_entry(&self) -> Option<Entry<'_>> {
        self.selected.and_then(|i| self.entries().nth(i))
    }
}

struct Session<S> {
    query: String,
    phase: Phase,
    open: bool,
    suggestions: Vec<SuggestionItem>,
    selected: Option<usize>,
    recents: RecentSearchStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    fn key(&self) -> &str {
        self.query.trim()
    }

    fn entry_count(&self) -> usize {
        self.suggestions.len() + self.recents.len()
    }

    fn dismiss(&mut self) {
        self.open = false;
        self.phase = Phase::Idle;
        self.selected = None;
    }

    fn commit_at(&mut self, index: usize) -> Option<Commit> {
        if let Some(item) = self.suggestions.get(index) {
            let item = item.clone();
            return self.commit(item.name.clone(), CommitSource::Suggestion(item));
        }
        let term = self.recents.entries().get(index - self.suggestions.len())?.clone();
        self.commit(term, CommitSource::Recent)
    }

    fn commit(&mut self, term: String, source: CommitSource) -> Option<Commit> {
        let term = term.trim().to_string();
        if term.is_empty() {
            return None;
        }
        self.recents.record_search(&term);
        self.query = term.clone();
        self.suggestions.clear();
        self.dismiss();
        Some(Commit { term, source })
    }
}

struct Shared<S> {
    backend: Arc<dyn SearchBackend>,
    config: SuggestConfig,
    session: Mutex<Session<S>>,
}

impl<S> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, Session<S>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Autocomplete for one search box.
///
/// All methods are synchronous and cheap; fetching happens on the tokio
/// runtime the engine was created in.
pub struct SuggestionEngine<S> {
    shared: Arc<Shared<S>>,
    fetch_gate: Arc<Debouncer<String>>,
    blur_gate: Debouncer<()>,
}

impl<S: KeyValueStore + Send + 'static> SuggestionEngine<S> {
    /// Create an engine over a search backend and a recent-search list.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        recents: RecentSearchStore<S>,
        config: SuggestConfig,
    ) -> Self {
        let shared = Arc::new(Shared {
            backend,
            config: config.clone(),
            session: Mutex::new(Session {
                query: String::new(),
                phase: Phase::Idle,
                open: false,
                suggestions: Vec::new(),
                selected: None,
                recents,
            }),
        });

        let fetch_shared = Arc::clone(&shared);
        let fetch_gate = Arc::new(Debouncer::new(config.debounce(), move |key: String| {
            fetch_suggestions(Arc::clone(&fetch_shared), key)
        }));

        let blur_shared = Arc::clone(&shared);
        let blur_fetch = Arc::clone(&fetch_gate);
        let blur_gate = Debouncer::new(config.blur_grace(), move |()| {
            let shared = Arc::clone(&blur_shared);
            let fetch_gate = Arc::clone(&blur_fetch);
            async move {
                fetch_gate.cancel();
                shared.lock().dismiss();
            }
        });

        Self {
            shared,
            fetch_gate,
            blur_gate,
        }
    }

    /// The search box text changed.
    pub fn input(&self, text: &str) {
        let mut session = self.shared.lock();
        session.query = text.to_string();
        session.selected = None;

        if session.key().chars().count() < self.shared.config.min_query_chars {
            session.suggestions.clear();
            session.phase = Phase::Idle;
            self.fetch_gate.cancel();
            return;
        }

        session.phase = Phase::Pending;
        session.open = true;
        let key = session.key().to_string();
        drop(session);

        tracing::debug!(query = %key, "scheduling suggestion fetch");
        self.fetch_gate.call(key);
    }

    /// Handle a navigation key. Returns the committed term on `Enter`.
    pub fn handle_key(&self, key: NavKey) -> Option<Commit> {
        let mut session = self.shared.lock();
        match key {
            NavKey::ArrowDown => {
                let count = session.entry_count();
                if session.open && count > 0 {
                    session.selected = Some(match session.selected {
                        None => 0,
                        Some(i) => (i + 1).min(count - 1),
                    });
                }
                None
            }
            NavKey::ArrowUp => {
                if session.open {
                    session.selected = match session.selected {
                        None | Some(0) => None,
                        Some(i) => Some(i - 1),
                    };
                }
                None
            }
            NavKey::Enter => {
                let commit = match session.selected.filter(|i| *i < session.entry_count()) {
                    Some(index) if session.open => session.commit_at(index),
                    _ => {
                        let text = session.query.clone();
                        session.commit(text, CommitSource::Text)
                    }
                };
                drop(session);
                self.after_commit(commit)
            }
            NavKey::Escape => {
                session.dismiss();
                drop(session);
                self.fetch_gate.cancel();
                None
            }
        }
    }

    /// A row was clicked.
    pub fn click(&self, index: usize) -> Option<Commit> {
        self.blur_gate.cancel();
        let commit = {
            let mut session = self.shared.lock();
            if index < session.entry_count() {
                session.commit_at(index)
            } else {
                None
            }
        };
        self.after_commit(commit)
    }

    /// The search box gained focus. Reopens the list and refetches if the
    /// query is long enough.
    pub fn focus(&self) {
        self.blur_gate.cancel();
        let query = {
            let mut session = self.shared.lock();
            session.open = true;
            if session.phase == Phase::Showing {
                return;
            }
            session.query.clone()
        };
        self.input(&query);
    }

    /// The search box lost focus. After the grace period the list hides and
    /// any scheduled fetch is dropped.
    pub fn blur(&self) {
        self.blur_gate.call(());
    }

    /// A click landed outside the search box. The list hides immediately.
    pub fn click_outside(&self) {
        self.blur_gate.cancel();
        self.fetch_gate.cancel();
        self.shared.lock().dismiss();
    }

    /// Empty the search box.
    pub fn clear(&self) {
        self.input("");
    }

    /// Forget all recent searches.
    pub fn clear_recents(&self) {
        let mut session = self.shared.lock();
        session.recents.clear();
        session.selected = None;
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SuggestionView {
        let session = self.shared.lock();
        SuggestionView {
            query: session.query.clone(),
            phase: session.phase,
            open: session.open,
            suggestions: session.suggestions.clone(),
            recents: session.recents.entries().to_vec(),
            selected: session.selected,
        }
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    pub fn selected(&self) -> Option<usize> {
        self.shared.lock().selected
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.shared.config
    }

    fn after_commit(&self, commit: Option<Commit>) -> Option<Commit> {
        if let Some(commit) = &commit {
            self.fetch_gate.cancel();
            tracing::debug!(term = %commit.term, "search committed");
        }
        commit
    }
}

async fn fetch_suggestions<S: KeyValueStore>(shared: Arc<Shared<S>>, key: String) {
    let request = SearchRequest::new(key.as_str()).with_pagination(0, shared.config.max_suggestions);
    let outcome = shared.backend.search(&request).await;

    let mut session = shared.lock();
    if session.phase != Phase::Pending || session.key() != key {
        tracing::debug!(query = %key, current = %session.key(), "discarding stale suggestions");
        return;
    }

    session.suggestions = match outcome {
        Ok(page) => page
            .items
            .iter()
            .filter_map(to_suggestion_item)
            .take(shared.config.max_suggestions as usize)
            .collect(),
        Err(e) => {
            tracing::warn!(query = %key, error = %e, "suggestion fetch failed");
            Vec::new()
        }
    };
    session.phase = Phase::Showing;
    session.selected = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use storefront_cache::MemoryStore;
    use storefront_search::search::ResultPage;
    use storefront_search::SearchError;
    use tokio::time::sleep;

    /// Backend with per-query latency that records every request.
    #[derive(Default)]
    struct ScriptedBackend {
        latency: HashMap<String, Duration>,
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn with_latency(mut self, query: &str, ms: u64) -> Self {
            self.latency.insert(query.to_string(), Duration::from_millis(ms));
            self
        }

        fn failing_on(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, request: &SearchRequest) -> Result<ResultPage<Value>, SearchError> {
            self.calls.lock().unwrap().push(request.text.clone());
            if let Some(delay) = self.latency.get(&request.text) {
                sleep(*delay).await;
            }
            if self.failing.contains(&request.text) {
                return Err(SearchError::Upstream("503".to_string()));
            }
            let hits = (1..=2)
                .map(|i| json!({"objectID": format!("{}-{}", request.text, i), "name": format!("{} {}", request.text, i), "price": 1000 * i}))
                .collect();
            Ok(ResultPage::new(hits, 2, 1, 0))
        }
    }

    fn engine_with(backend: Arc<ScriptedBackend>, recents: &[&str]) -> SuggestionEngine<MemoryStore> {
        let mut store = RecentSearchStore::new(MemoryStore::new());
        for term in recents.iter().rev() {
            store.record_search(term);
        }
        SuggestionEngine::new(backend, store, SuggestConfig::default())
    }

    fn names(view: &SuggestionView) -> Vec<String> {
        view.suggestions.iter().map(|s| s.name.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_char_never_fetches() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("a");
        assert_eq!(engine.phase(), Phase::Idle);
        sleep(Duration::from_secs(1)).await;

        assert!(backend.calls().is_empty());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_chars_fetch_once_after_debounce() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("a");
        engine.input("ab");
        assert_eq!(engine.phase(), Phase::Pending);

        sleep(Duration::from_millis(299)).await;
        assert!(backend.calls().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(backend.calls(), vec!["ab"]);

        let view = engine.view();
        assert_eq!(view.phase, Phase::Showing);
        assert!(view.open);
        assert_eq!(names(&view), vec!["ab 1", "ab 2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_fetches_last_query_only() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        for text in ["ph", "pho", "phon", "phone"] {
            engine.input(text);
            sleep(Duration::from_millis(50)).await;
        }
        sleep(Duration::from_secs(1)).await;

        assert_eq!(backend.calls(), vec!["phone"]);
        assert_eq!(names(&engine.view()), vec!["phone 1", "phone 2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_resolution_is_discarded() {
        // "ab" is slow enough to resolve after "abc".
        let backend = Arc::new(ScriptedBackend::default().with_latency("ab", 1_000));
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        sleep(Duration::from_millis(350)).await;
        engine.input("abc");
        sleep(Duration::from_millis(350)).await;

        assert_eq!(backend.calls(), vec!["ab", "abc"]);
        assert_eq!(names(&engine.view()), vec!["abc 1", "abc 2"]);

        sleep(Duration::from_secs(2)).await;
        let view = engine.view();
        assert_eq!(view.phase, Phase::Showing);
        assert_eq!(names(&view), vec!["abc 1", "abc 2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shrinking_below_threshold_clears_and_cancels() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(engine.view().suggestions.len(), 2);

        engine.input("abc");
        engine.input(" a ");
        let view = engine.view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.suggestions.is_empty());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.calls(), vec!["ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_keeps_recents() {
        let backend = Arc::new(ScriptedBackend::default().failing_on("xy"));
        let engine = engine_with(Arc::clone(&backend), &["kettle"]);

        engine.input("xy");
        sleep(Duration::from_millis(400)).await;

        let view = engine.view();
        assert_eq!(view.phase, Phase::Showing);
        assert!(view.suggestions.is_empty());
        assert_eq!(view.recents, vec!["kettle"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_navigation_clamps_across_both_lists() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan", "iron"]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(engine.selected(), None);

        for expected in [0, 1, 2, 3, 3] {
            engine.handle_key(NavKey::ArrowDown);
            assert_eq!(engine.selected(), Some(expected));
        }
        assert_eq!(engine.view().selected_entry(), Some(Entry::Recent("iron")));

        for expected in [Some(2), Some(1), Some(0), None, None] {
            engine.handle_key(NavKey::ArrowUp);
            assert_eq!(engine.selected(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_resets_selection() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan"]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;
        engine.handle_key(NavKey::ArrowDown);
        engine.handle_key(NavKey::ArrowDown);
        assert_eq!(engine.selected(), Some(1));

        // Re-rendering does not touch the selection.
        let _ = engine.view();
        assert_eq!(engine.selected(), Some(1));

        engine.input("abc");
        assert_eq!(engine.selected(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_commits_selected_suggestion() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan"]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;
        engine.handle_key(NavKey::ArrowDown);
        engine.handle_key(NavKey::ArrowDown);

        let commit = engine.handle_key(NavKey::Enter).unwrap();
        assert_eq!(commit.term, "ab 2");
        assert!(matches!(commit.source, CommitSource::Suggestion(ref item) if item.id == "ab-2"));

        let view = engine.view();
        assert!(!view.open);
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.recents, vec!["ab 2", "fan"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_commits_selected_recent() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan", "iron"]);

        engine.focus();
        engine.handle_key(NavKey::ArrowDown);
        engine.handle_key(NavKey::ArrowDown);

        let commit = engine.handle_key(NavKey::Enter).unwrap();
        assert_eq!(
            commit,
            Commit {
                term: "iron".to_string(),
                source: CommitSource::Recent
            }
        );
        assert_eq!(engine.view().recents, vec!["iron", "fan"]);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_selection_commits_text() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("  desk lamp ");
        let commit = engine.handle_key(NavKey::Enter).unwrap();
        assert_eq!(commit.term, "desk lamp");
        assert_eq!(commit.source, CommitSource::Text);

        // The pending fetch was cancelled by the commit.
        sleep(Duration::from_secs(1)).await;
        assert!(backend.calls().is_empty());
        assert_eq!(engine.view().recents, vec!["desk lamp"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_empty_text_does_nothing() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("   ");
        assert_eq!(engine.handle_key(NavKey::Enter), None);
        assert!(engine.view().recents.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_hides_but_keeps_text() {
        let backend = Arc::new(ScriptedBackend::default().with_latency("ab", 100));
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        sleep(Duration::from_millis(350)).await;
        engine.handle_key(NavKey::Escape);
        sleep(Duration::from_secs(1)).await;

        let view = engine.view();
        assert_eq!(view.query, "ab");
        assert!(!view.open);
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.selected, None);
        assert!(view.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_waits_for_grace_period() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan"]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;

        engine.blur();
        sleep(Duration::from_millis(100)).await;
        assert!(engine.view().open);

        // A click inside the grace period still lands.
        let commit = engine.click(2).unwrap();
        assert_eq!(commit.term, "fan");
        assert_eq!(commit.source, CommitSource::Recent);

        engine.focus();
        engine.blur();
        sleep(Duration::from_millis(250)).await;
        assert!(!engine.view().open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_while_pending_skips_fetch() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        engine.blur();
        sleep(Duration::from_secs(1)).await;

        let view = engine.view();
        assert!(!view.open);
        assert_eq!(view.phase, Phase::Idle);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_outside_hides_immediately() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        sleep(Duration::from_millis(400)).await;
        engine.click_outside();

        let view = engine.view();
        assert!(!view.open);
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.query, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_refetches_long_query() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &[]);

        engine.input("ab");
        engine.click_outside();
        engine.focus();
        assert_eq!(engine.phase(), Phase::Pending);
        sleep(Duration::from_millis(400)).await;

        assert_eq!(backend.calls(), vec!["ab"]);
        assert_eq!(engine.phase(), Phase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_recents() {
        let backend = Arc::new(ScriptedBackend::default());
        let engine = engine_with(Arc::clone(&backend), &["fan", "iron"]);

        engine.clear_recents();
        assert!(engine.view().recents.is_empty());
        assert_eq!(engine.click(0), None);
    }
}
