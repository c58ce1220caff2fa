//! Catalog domain errors.

use thiserror::Error;
use uuid::Uuid;

/// Price floor for catalog books.
pub const MIN_PRICE: f64 = 10.0;
/// Price ceiling for catalog books.
pub const MAX_PRICE: f64 = 1000.0;
/// Longest accepted book title.
pub const MAX_TITLE_LEN: usize = 200;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Book not found: {id}")]
    BookNotFound { id: Uuid },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: Uuid },

    #[error("Price {price} out of range: must be between {MIN_PRICE} and {MAX_PRICE}")]
    PriceOutOfRange { price: f64 },

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title too long: {len} characters (max: {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Invalid price filter: {message}")]
    InvalidPriceFilter { message: String },

    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },
}

impl DomainError {
    pub fn book_not_found(id: Uuid) -> Self {
        Self::BookNotFound { id }
    }

    pub fn category_not_found(id: Uuid) -> Self {
        Self::CategoryNotFound { id }
    }

    pub fn price_out_of_range(price: f64) -> Self {
        Self::PriceOutOfRange { price }
    }

    pub fn title_too_long(len: usize) -> Self {
        Self::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        }
    }

    pub fn invalid_price_filter(message: impl Into<String>) -> Self {
        Self::InvalidPriceFilter {
            message: message.into(),
        }
    }

    pub fn invalid_page_request(message: impl Into<String>) -> Self {
        Self::InvalidPageRequest {
            message: message.into(),
        }
    }
}
