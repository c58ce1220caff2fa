//! Repository seam for catalog storage.
//!
//! The pipeline's upstream collaborator: hands back already-filtered,
//! already-sorted, already-paged entities. The in-memory implementations
//! stand in for a real database; ordering is deterministic (title/name,
//! then id) so paging is stable across calls.

use async_trait::async_trait;
use bookshelf_hypermedia::{Page, PageMeta};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Book, BookFilter, Category, PageRequest};

#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn list(&self, filter: BookFilter, page: PageRequest) -> Result<Page<Book>, DomainError>;
    async fn list_by_category(
        &self,
        category_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Book>, DomainError>;
    async fn get(&self, id: Uuid) -> Result<Option<Book>, DomainError>;
    async fn insert(&self, book: Book) -> Result<Book, DomainError>;
    async fn update(&self, book: Book) -> Result<Book, DomainError>;
    /// Returns whether a book was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Page<Category>, DomainError>;
    async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError>;
    async fn insert(&self, category: Category) -> Result<Category, DomainError>;
    async fn update(&self, category: Category) -> Result<Category, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// Slice a sorted snapshot into one page.
fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let meta = PageMeta::new(page.page, page.size, total);
    let start = (page.page - 1).saturating_mul(page.size);
    let items = if start >= total {
        Vec::new()
    } else {
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        let end = start.saturating_add(usize::try_from(page.size).unwrap_or(usize::MAX));
        items.drain(start..end.min(items.len())).collect()
    };
    Page::new(items, meta)
}

/// In-memory book store.
#[derive(Default)]
pub struct InMemoryBooksRepository {
    books: DashMap<Uuid, Book>,
}

impl InMemoryBooksRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_snapshot<F: Fn(&Book) -> bool>(&self, keep: F) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        books
    }
}

#[async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn list(&self, filter: BookFilter, page: PageRequest) -> Result<Page<Book>, DomainError> {
        Ok(paginate(self.sorted_snapshot(|b| filter.matches(b)), page))
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Book>, DomainError> {
        Ok(paginate(
            self.sorted_snapshot(|b| b.category_id == category_id),
            page,
        ))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        Ok(self.books.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, book: Book) -> Result<Book, DomainError> {
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.books.remove(&id).is_some())
    }
}

/// In-memory category store.
#[derive(Default)]
pub struct InMemoryCategoriesRepository {
    categories: DashMap<Uuid, Category>,
}

impl InMemoryCategoriesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoriesRepository for InMemoryCategoriesRepository {
    async fn list(&self, page: PageRequest) -> Result<Page<Category>, DomainError> {
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(categories, page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.categories.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, category: Category) -> Result<Category, DomainError> {
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, DomainError> {
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.categories.remove(&id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn book(title: &str, price: f64) -> Book {
        Book {
            id: Uuid::now_v7(),
            title: title.to_owned(),
            price,
            category_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn listing_is_sorted_and_paged() {
        let repo = InMemoryBooksRepository::new();
        for title in ["c", "a", "b"] {
            repo.insert(book(title, 20.0)).await.unwrap();
        }

        let page = repo
            .list(BookFilter::default(), PageRequest { page: 1, size: 2 })
            .await
            .unwrap();
        let titles: Vec<&str> = page.items.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(page.meta.total_count, 3);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn price_filter_applies_before_paging() {
        let repo = InMemoryBooksRepository::new();
        repo.insert(book("cheap", 15.0)).await.unwrap();
        repo.insert(book("mid", 50.0)).await.unwrap();
        repo.insert(book("dear", 500.0)).await.unwrap();

        let filter = BookFilter {
            min_price: Some(20.0),
            max_price: Some(100.0),
        };
        let page = repo
            .list(filter, PageRequest { page: 1, size: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "mid");
        assert_eq!(page.meta.total_count, 1);
    }

    #[tokio::test]
    async fn out_of_range_page_is_empty_with_correct_meta() {
        let repo = InMemoryBooksRepository::new();
        repo.insert(book("only", 20.0)).await.unwrap();

        let page = repo
            .list(BookFilter::default(), PageRequest { page: 5, size: 10 })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_count, 1);
        assert_eq!(page.meta.current_page, 5);
    }
}
