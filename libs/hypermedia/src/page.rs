//! Pagination metadata.
//!
//! Paging itself happens in the persistence collaborator; this module only
//! carries the numbers through the pipeline and renders them into the
//! `x-pagination` response header so non-hypermedia clients still get paging
//! info without it leaking into the body.

use serde::{Deserialize, Serialize};

/// Response header carrying [`PageMeta`] as JSON.
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Position of a page within a collection. Pages are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct PageMeta {
    pub current_page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PageMeta {
    /// Build metadata for the given page position, deriving `total_pages`.
    pub fn new(current_page: u64, page_size: u64, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };
        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Render as the `x-pagination` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        // Serializing a struct of four integers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One page of items plus its position within the collection.
#[derive(Clone, Debug)]
#[must_use]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Map the items while keeping the page position.
    pub fn map_items<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
