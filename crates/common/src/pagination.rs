//! Pagination types.
//!
//! List endpoints return fixed-size pages of ten items. Page numbers are
//! 1-based; out-of-range requests degrade to the nearest valid page rather
//! than erroring.

use serde::{Deserialize, Serialize};

/// Number of items per page for all list endpoints.
pub const PAGE_SIZE: u64 = 10;

/// Page request, deserialized from the `?page=` query parameter.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    /// Requested 1-based page number. Missing, zero or garbled resolves
    /// to page 1.
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u64>,
}

/// Accepts a number or a numeric string, treating anything else as
/// absent, so `?page=abc` degrades to the first page instead of a 400.
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer) {
        Ok(Some(Raw::Number(n))) => Some(n),
        Ok(Some(Raw::Text(s))) => s.parse().ok(),
        Ok(None) | Err(_) => None,
    })
}

impl PageRequest {
    /// Create a request for a specific page.
    #[must_use]
    pub const fn new(page: u64) -> Self {
        Self { page: Some(page) }
    }

    /// The requested page number, with missing and zero treated as page 1.
    #[must_use]
    pub fn number(self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Clamp the request against the total number of pages.
    ///
    /// An empty collection still has one (empty) page, so the result is
    /// always in `1..=max(total_pages, 1)`.
    #[must_use]
    pub fn clamp(self, total_pages: u64) -> u64 {
        self.number().min(total_pages.max(1))
    }
}

/// A fixed-size page of items plus position metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number (after clamping).
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Build a page envelope from a fetched slice and collection totals.
    #[must_use]
    pub fn new(items: Vec<T>, page: u64, total_items: u64, total_pages: u64) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Map the items of this page, preserving position metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
