//! Search results and pagination.

use serde::{Deserialize, Serialize};

/// One page of hits from the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultPage<T> {
    /// The hits on this page.
    pub items: Vec<T>,
    /// Total number of matching items.
    pub total_count: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Page these items belong to (0-indexed).
    pub page: u32,
}

impl<T> ResultPage<T> {
    /// Create a results page.
    pub fn new(items: Vec<T>, total_count: u64, total_pages: u32, page: u32) -> Self {
        Self {
            items,
            total_count,
            total_pages,
            page,
        }
    }

    /// Create empty results.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, 0)
    }

    /// Map every item, keeping the counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ResultPage<U> {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            page: self.page,
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Pager state for these results.
    pub fn pagination(&self) -> Pagination {
        Pagination::from_page(self)
    }
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pager state for a results page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (0-indexed).
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items.
    pub total: u64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, total_pages: u32, total: u64) -> Self {
        Self {
            page,
            total_pages,
            total,
            has_next: page.saturating_add(1) < total_pages,
            has_prev: page > 0,
        }
    }

    /// Pager state for a page of results.
    pub fn from_page<T>(results: &ResultPage<T>) -> Self {
        Self::new(results.page, results.total_pages, results.total_count)
    }

    /// Get page numbers for display, 0-indexed, centred on the current page.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<u32> {
        if self.total_pages as usize <= max_visible {
            return (0..self.total_pages).collect();
        }

        let max_visible = max_visible.max(1) as u32;
        let half = max_visible / 2;
        let start = self.page.saturating_sub(half);
        let end = start.saturating_add(max_visible).min(self.total_pages);
        let start = end - max_visible;

        (start..end).collect()
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    /// Check if on last page.
    pub fn is_last(&self) -> bool {
        self.page.saturating_add(1) >= self.total_pages
    }
}
