//! Route assembly and the resource route-template families.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Json, Router, middleware};
use bookshelf_hypermedia::{ResourceRoutes, SubResource};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    BookDto, CategoryDto, CreateBookReq, CreateCategoryReq, UpdateBookReq, UpdateCategoryReq,
};
use crate::api::rest::{handlers, security};
use crate::domain::service::CatalogService;

pub const BOOKS_PATH: &str = "/api/books";
pub const CATEGORIES_PATH: &str = "/api/categories";

/// Route template family for books; a book links to its category.
pub const BOOK_ROUTES: ResourceRoutes = ResourceRoutes {
    resource: "book",
    collection_path: BOOKS_PATH,
    sub_resource: Some(SubResource {
        rel: "category",
        segment: "category",
    }),
};

/// Route template family for categories; a category links to its books.
pub const CATEGORY_ROUTES: ResourceRoutes = ResourceRoutes {
    resource: "category",
    collection_path: CATEGORIES_PATH,
    sub_resource: Some(SubResource {
        rel: "books",
        segment: "books",
    }),
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        description = "Books and categories catalog with field selection, \
                       hypermedia links, and JSON/XML/CSV output",
        version = "0.1.0"
    ),
    components(schemas(
        BookDto,
        CategoryDto,
        CreateBookReq,
        UpdateBookReq,
        CreateCategoryReq,
        UpdateCategoryReq
    ))
)]
struct ApiDoc;

async fn openapi_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the catalog router with the auth-context layer applied.
pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route(
            "/api/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route(
            "/api/books/{id}",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route("/api/books/{id}/category", get(handlers::get_book_category))
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/books",
            get(handlers::list_category_books),
        )
        .route("/api-docs/openapi.json", get(openapi_doc))
        .layer(Extension(service))
        .layer(middleware::from_fn(security::attach_auth_context))
}
