//! Paged query parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for one paged query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Case-insensitive substring filter; empty means unfiltered.
    pub search: Option<String>,
    /// Field to sort by; empty or unknown falls back to the schema default.
    pub sort_by: Option<String>,
    /// Sort descending instead of ascending.
    pub descending: bool,
    /// Zero-based page index.
    pub page: usize,
    /// Page size.
    pub rows_per_page: usize,
}

impl PageQuery {
    /// A query for the given page of the given size, unfiltered.
    pub fn page(page: usize, rows_per_page: usize) -> Self {
        Self {
            page,
            rows_per_page,
            ..Default::default()
        }
    }

    /// Set the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the sort field and direction.
    pub fn sorted_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.sort_by = Some(field.into());
        self.descending = descending;
        self
    }
}

/// A bounded slice of a filtered, ordered result set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// The rows on this page.
    pub items: Vec<Value>,
    /// Total rows matching the filter, across all pages.
    pub total: u64,
    /// The search term the filter applied.
    pub search: Option<String>,
    /// The field the rows are sorted by.
    pub sort_by: Option<String>,
    /// Whether the sort is descending.
    pub descending: bool,
    /// Zero-based page index.
    pub page: usize,
    /// Page size.
    pub rows_per_page: usize,
}
