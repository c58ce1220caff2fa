//! Catalog domain service: validation, then repository access.

use std::sync::Arc;

use bookshelf_hypermedia::Page;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::domain::error::{DomainError, MAX_PRICE, MAX_TITLE_LEN, MIN_PRICE};
use crate::domain::model::{
    Book, BookFilter, BookPatch, Category, CategoryPatch, NewBook, NewCategory, PageRequest,
};
use crate::domain::repo::{BooksRepository, CategoriesRepository};

/// Domain service for books and categories.
#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BooksRepository>,
    categories: Arc<dyn CategoriesRepository>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        books: Arc<dyn BooksRepository>,
        categories: Arc<dyn CategoriesRepository>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            books,
            categories,
            config,
        }
    }

    /// Validate raw paging parameters: 1-based page, size defaulted and
    /// clamped to the configured maximum.
    ///
    /// # Errors
    /// `InvalidPageRequest` for a zero page or zero size.
    pub fn page_request(
        &self,
        page: Option<u64>,
        size: Option<u64>,
    ) -> Result<PageRequest, DomainError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::invalid_page_request("page numbers are 1-based"));
        }
        let size = size.unwrap_or(self.config.default_page_size);
        if size == 0 {
            return Err(DomainError::invalid_page_request("page size must be positive"));
        }
        Ok(PageRequest {
            page,
            size: size.min(self.config.max_page_size),
        })
    }

    fn validate_filter(filter: BookFilter) -> Result<BookFilter, DomainError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if max < min {
                return Err(DomainError::invalid_price_filter(
                    "max_price must not be less than min_price",
                ));
            }
        }
        Ok(filter)
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(DomainError::title_too_long(title.len()));
        }
        Ok(())
    }

    fn validate_price(price: f64) -> Result<(), DomainError> {
        if !price.is_finite() || !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(DomainError::price_out_of_range(price));
        }
        Ok(())
    }

    async fn require_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| DomainError::category_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn list_books(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> Result<Page<Book>, DomainError> {
        let filter = Self::validate_filter(filter)?;
        self.books.list(filter, page).await
    }

    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn get_book(&self, id: Uuid) -> Result<Book, DomainError> {
        self.books
            .get(id)
            .await?
            .ok_or_else(|| DomainError::book_not_found(id))
    }

    #[instrument(skip(self, new_book), fields(title = %new_book.title))]
    pub async fn create_book(&self, new_book: NewBook) -> Result<Book, DomainError> {
        Self::validate_title(&new_book.title)?;
        Self::validate_price(new_book.price)?;
        self.require_category(new_book.category_id).await?;

        let book = Book {
            id: new_book.id.unwrap_or_else(Uuid::now_v7),
            title: new_book.title,
            price: new_book.price,
            category_id: new_book.category_id,
            created_at: OffsetDateTime::now_utc(),
        };
        debug!(book_id = %book.id, "creating book");
        self.books.insert(book).await
    }

    #[instrument(skip(self, patch), fields(book_id = %id))]
    pub async fn update_book(&self, id: Uuid, patch: BookPatch) -> Result<Book, DomainError> {
        let mut book = self.get_book(id).await?;

        if let Some(title) = patch.title {
            Self::validate_title(&title)?;
            book.title = title;
        }
        if let Some(price) = patch.price {
            Self::validate_price(price)?;
            book.price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.require_category(category_id).await?;
            book.category_id = category_id;
        }

        self.books.update(book).await
    }

    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn delete_book(&self, id: Uuid) -> Result<(), DomainError> {
        if self.books.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::book_not_found(id))
        }
    }

    /// The category a book belongs to.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn get_book_category(&self, id: Uuid) -> Result<Category, DomainError> {
        let book = self.get_book(id).await?;
        self.require_category(book.category_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self, page: PageRequest) -> Result<Page<Category>, DomainError> {
        self.categories.list(page).await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.require_category(id).await
    }

    #[instrument(skip(self, new_category), fields(name = %new_category.name))]
    pub async fn create_category(&self, new_category: NewCategory) -> Result<Category, DomainError> {
        Self::validate_title(&new_category.name)?;
        let category = Category {
            id: new_category.id.unwrap_or_else(Uuid::now_v7),
            name: new_category.name,
            created_at: OffsetDateTime::now_utc(),
        };
        self.categories.insert(category).await
    }

    #[instrument(skip(self, patch), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        let mut category = self.require_category(id).await?;
        if let Some(name) = patch.name {
            Self::validate_title(&name)?;
            category.name = name;
        }
        self.categories.update(category).await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        if self.categories.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::category_not_found(id))
        }
    }

    /// Books belonging to one category.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn list_category_books(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Book>, DomainError> {
        self.require_category(id).await?;
        self.books.list_by_category(id, page).await
    }

    /// Seed a small demo catalog. Idempotence is not a goal; intended for
    /// fresh in-memory stores at startup and in tests.
    pub async fn seed_demo_data(&self) -> Result<(), DomainError> {
        let programming = self
            .create_category(NewCategory {
                id: None,
                name: "Programming".to_owned(),
            })
            .await?;
        let databases = self
            .create_category(NewCategory {
                id: None,
                name: "Databases".to_owned(),
            })
            .await?;

        for (title, price, category) in [
            ("Go in Action", 35.0, programming.id),
            ("The Rust Programming Language", 40.0, programming.id),
            ("Designing Data-Intensive Applications", 55.0, databases.id),
        ] {
            self.create_book(NewBook {
                id: None,
                title: title.to_owned(),
                price,
                category_id: category,
            })
            .await?;
        }
        Ok(())
    }
}
