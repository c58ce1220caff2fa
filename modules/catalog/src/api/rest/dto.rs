//! REST DTOs and their shaping contracts.
//!
//! The `Shapeable` impls are what plug catalog entities into the generic
//! response-shaping pipeline: they declare the selectable property names and
//! expose by-name reads over the serialized representation.

use bookshelf_hypermedia::{FieldValue, Shapeable};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::model::{Book, BookPatch, Category, CategoryPatch, NewBook, NewCategory};

/// REST representation of a book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub category_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request body for creating a book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookReq {
    /// Optional ID; a UUID v7 is generated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub price: f64,
    pub category_id: Uuid,
}

/// Request body for a partial book update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateBookReq {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<Uuid>,
}

/// REST representation of a category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request body for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
}

/// Request body for a partial category update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateCategoryReq {
    pub name: Option<String>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            price: book.price,
            category_id: book.category_id,
            created_at: book.created_at,
        }
    }
}

impl From<CreateBookReq> for NewBook {
    fn from(req: CreateBookReq) -> Self {
        Self {
            id: req.id,
            title: req.title,
            price: req.price,
            category_id: req.category_id,
        }
    }
}

impl From<UpdateBookReq> for BookPatch {
    fn from(req: UpdateBookReq) -> Self {
        Self {
            title: req.title,
            price: req.price,
            category_id: req.category_id,
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

impl From<CreateCategoryReq> for NewCategory {
    fn from(req: CreateCategoryReq) -> Self {
        Self {
            id: req.id,
            name: req.name,
        }
    }
}

impl From<UpdateCategoryReq> for CategoryPatch {
    fn from(req: UpdateCategoryReq) -> Self {
        Self { name: req.name }
    }
}

fn rfc3339(ts: OffsetDateTime) -> FieldValue {
    ts.format(&Rfc3339).map_or(FieldValue::Null, FieldValue::Str)
}

impl Shapeable for BookDto {
    fn resource_name() -> &'static str {
        "book"
    }

    fn declared_fields() -> &'static [&'static str] {
        &["id", "title", "price", "category_id", "created_at"]
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.as_str().into()),
            "price" => Some(self.price.into()),
            "category_id" => Some(self.category_id.into()),
            "created_at" => Some(rfc3339(self.created_at)),
            _ => None,
        }
    }
}

impl Shapeable for CategoryDto {
    fn resource_name() -> &'static str {
        "category"
    }

    fn declared_fields() -> &'static [&'static str] {
        &["id", "name", "created_at"]
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "created_at" => Some(rfc3339(self.created_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bookshelf_hypermedia::{FieldSet, shape};

    fn book_dto() -> BookDto {
        BookDto {
            id: Uuid::nil(),
            title: "Go in Action".to_owned(),
            price: 35.0,
            category_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn every_declared_field_is_readable() {
        let dto = book_dto();
        for field in BookDto::declared_fields() {
            assert!(dto.field_value(field).is_some(), "unreadable field {field}");
        }
    }

    #[test]
    fn shaping_against_declared_fields_succeeds() {
        let fields = FieldSet::resolve(Some("title,price"), BookDto::declared_fields());
        let shaped = shape(&book_dto(), &fields).unwrap();
        let names: Vec<&str> = shaped.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "title", "price"]);
    }

    #[test]
    fn created_at_renders_as_rfc3339() {
        let dto = book_dto();
        let FieldValue::Str(ts) = dto.field_value("created_at").unwrap() else {
            panic!("expected string timestamp");
        };
        assert_eq!(ts, "1970-01-01T00:00:00Z");
    }
}
