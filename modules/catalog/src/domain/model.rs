//! Catalog domain models.

use time::OffsetDateTime;
use uuid::Uuid;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub category_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Payload for creating a book. `id` is generated when absent.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub id: Option<Uuid>,
    pub title: String,
    pub price: f64,
    pub category_id: Uuid,
}

/// Partial update for a book.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<Uuid>,
}

/// A book category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Payload for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: Option<Uuid>,
    pub name: String,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

/// Price-range filter for book listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl BookFilter {
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        self.min_price.is_none_or(|min| book.price >= min)
            && self.max_price.is_none_or(|max| book.price <= max)
    }
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}
