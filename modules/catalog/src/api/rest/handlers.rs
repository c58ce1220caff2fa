//! REST handlers.
//!
//! Read endpoints drive the full shaping pipeline: negotiate the media type
//! first (so unsupported types fail before any work and before any response
//! byte exists), then shape, assemble, and encode into a buffer that becomes
//! the response body in one piece. Mutation endpoints are role-gated and
//! answer in plain JSON.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Extension, Path, Query};
use axum::response::{IntoResponse, Response};
use bookshelf_hypermedia::{
    AuthContext, Envelope, EnvelopeAssembler, FieldSet, LinkBuilder, MediaType, PAGINATION_HEADER,
    Page, PageMeta, Shapeable, encode, error_to_problem, output_columns, shape, shape_all,
};
use bookshelf_problem::{Problem, forbidden, internal_error};
use http::{HeaderMap, StatusCode, Uri, header};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{
    BookDto, CategoryDto, CreateBookReq, CreateCategoryReq, UpdateBookReq, UpdateCategoryReq,
};
use crate::api::rest::error::domain_error_to_problem;
use crate::api::rest::routes::{BOOK_ROUTES, BOOKS_PATH, CATEGORIES_PATH, CATEGORY_ROUTES};
use crate::domain::error::DomainError;
use crate::domain::model::BookFilter;
use crate::domain::service::CatalogService;

/// Query parameters for collection endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub fields: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Query parameters for single-resource endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct ItemParams {
    pub fields: Option<String>,
}

fn negotiate(headers: &HeaderMap, instance: &str) -> Result<MediaType, Problem> {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    MediaType::from_accept_header(accept).map_err(|e| error_to_problem(&e, instance))
}

fn domain_problem(instance: &str) -> impl Fn(DomainError) -> Problem + '_ {
    move |e| domain_error_to_problem(&e, instance)
}

fn require_modify(ctx: &AuthContext, instance: &str) -> Result<(), Problem> {
    if ctx.can_modify() {
        Ok(())
    } else {
        Err(forbidden("Editor or Admin role required").with_instance(instance))
    }
}

/// Encode an assembled envelope into a complete response. The body is
/// buffered first so an encoding failure yields a Problem response instead
/// of a truncated payload.
fn encoded_response(
    envelope: &Envelope,
    media: MediaType,
    meta: Option<&PageMeta>,
    instance: &str,
) -> Result<Response, Problem> {
    let mut buf = Vec::new();
    encode(envelope, media.format, &mut buf).map_err(|e| error_to_problem(&e, instance))?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media.content_type());
    if let Some(meta) = meta {
        builder = builder.header(PAGINATION_HEADER, meta.to_header_value());
    }
    builder
        .body(Body::from(buf))
        .map_err(|_| internal_error("failed to build response").with_instance(instance))
}

/// Shape one page of DTOs and encode it in the negotiated media type.
fn shaped_page_response<T: Shapeable>(
    page: &Page<T>,
    raw_fields: Option<&str>,
    media: MediaType,
    ctx: &AuthContext,
    links: &LinkBuilder,
    instance: &str,
) -> Result<Response, Problem> {
    let fields = FieldSet::resolve(raw_fields, T::declared_fields());
    let shaped = shape_all(&page.items, &fields).map_err(|e| error_to_problem(&e, instance))?;
    let envelope = EnvelopeAssembler::new(links, media).collection(
        output_columns::<T>(&fields),
        shaped,
        ctx,
        &page.meta,
        raw_fields,
    );
    encoded_response(&envelope, media, Some(&page.meta), instance)
}

/// Shape one DTO and encode it in the negotiated media type.
fn shaped_item_response<T: Shapeable>(
    item: &T,
    raw_fields: Option<&str>,
    media: MediaType,
    ctx: &AuthContext,
    links: &LinkBuilder,
    instance: &str,
) -> Result<Response, Problem> {
    let fields = FieldSet::resolve(raw_fields, T::declared_fields());
    let shaped = shape(item, &fields).map_err(|e| error_to_problem(&e, instance))?;
    let envelope =
        EnvelopeAssembler::new(links, media).one(output_columns::<T>(&fields), shaped, ctx);
    encoded_response(&envelope, media, None, instance)
}

/// List books with paging, price filtering, and field selection.
#[tracing::instrument(skip_all, fields(page = params.page, size = params.size))]
pub async fn list_books(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Query(params): Query<ListParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let page_req = svc
        .page_request(params.page, params.size)
        .map_err(domain_problem(instance))?;
    let filter = BookFilter {
        min_price: params.min_price,
        max_price: params.max_price,
    };

    let page = svc
        .list_books(filter, page_req)
        .await
        .map_err(domain_problem(instance))?
        .map_items(BookDto::from);

    let links = LinkBuilder::new(BOOK_ROUTES);
    shaped_page_response(&page, params.fields.as_deref(), media, &ctx, &links, instance)
}

/// Get one book with field selection.
#[tracing::instrument(skip_all, fields(book_id = %id))]
pub async fn get_book(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ItemParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let book = svc.get_book(id).await.map_err(domain_problem(instance))?;

    let links = LinkBuilder::new(BOOK_ROUTES);
    shaped_item_response(
        &BookDto::from(book),
        params.fields.as_deref(),
        media,
        &ctx,
        &links,
        instance,
    )
}

/// Create a book. Editor/Admin only.
#[tracing::instrument(skip_all, fields(title = %req.title))]
pub async fn create_book(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    uri: Uri,
    Json(req): Json<CreateBookReq>,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    let book = svc
        .create_book(req.into())
        .await
        .map_err(domain_problem(instance))?;
    info!(book_id = %book.id, "book created");

    let location = format!("{BOOKS_PATH}/{}", book.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BookDto::from(book)),
    )
        .into_response())
}

/// Update a book. Editor/Admin only.
#[tracing::instrument(skip_all, fields(book_id = %id))]
pub async fn update_book(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    uri: Uri,
    Json(req): Json<UpdateBookReq>,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    let book = svc
        .update_book(id, req.into())
        .await
        .map_err(domain_problem(instance))?;
    Ok(Json(BookDto::from(book)).into_response())
}

/// Delete a book. Editor/Admin only.
#[tracing::instrument(skip_all, fields(book_id = %id))]
pub async fn delete_book(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    svc.delete_book(id).await.map_err(domain_problem(instance))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Get the category a book belongs to.
#[tracing::instrument(skip_all, fields(book_id = %id))]
pub async fn get_book_category(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ItemParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let category = svc
        .get_book_category(id)
        .await
        .map_err(domain_problem(instance))?;

    let links = LinkBuilder::new(CATEGORY_ROUTES);
    shaped_item_response(
        &CategoryDto::from(category),
        params.fields.as_deref(),
        media,
        &ctx,
        &links,
        instance,
    )
}

/// List categories with paging and field selection.
#[tracing::instrument(skip_all, fields(page = params.page, size = params.size))]
pub async fn list_categories(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Query(params): Query<ListParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let page_req = svc
        .page_request(params.page, params.size)
        .map_err(domain_problem(instance))?;

    let page = svc
        .list_categories(page_req)
        .await
        .map_err(domain_problem(instance))?
        .map_items(CategoryDto::from);

    let links = LinkBuilder::new(CATEGORY_ROUTES);
    shaped_page_response(&page, params.fields.as_deref(), media, &ctx, &links, instance)
}

/// Get one category with field selection.
#[tracing::instrument(skip_all, fields(category_id = %id))]
pub async fn get_category(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ItemParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let category = svc.get_category(id).await.map_err(domain_problem(instance))?;

    let links = LinkBuilder::new(CATEGORY_ROUTES);
    shaped_item_response(
        &CategoryDto::from(category),
        params.fields.as_deref(),
        media,
        &ctx,
        &links,
        instance,
    )
}

/// Create a category. Editor/Admin only.
#[tracing::instrument(skip_all, fields(name = %req.name))]
pub async fn create_category(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    uri: Uri,
    Json(req): Json<CreateCategoryReq>,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    let category = svc
        .create_category(req.into())
        .await
        .map_err(domain_problem(instance))?;
    info!(category_id = %category.id, "category created");

    let location = format!("{CATEGORIES_PATH}/{}", category.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CategoryDto::from(category)),
    )
        .into_response())
}

/// Update a category. Editor/Admin only.
#[tracing::instrument(skip_all, fields(category_id = %id))]
pub async fn update_category(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    uri: Uri,
    Json(req): Json<UpdateCategoryReq>,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    let category = svc
        .update_category(id, req.into())
        .await
        .map_err(domain_problem(instance))?;
    Ok(Json(CategoryDto::from(category)).into_response())
}

/// Delete a category. Editor/Admin only.
#[tracing::instrument(skip_all, fields(category_id = %id))]
pub async fn delete_category(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Response, Problem> {
    let instance = uri.path();
    require_modify(&ctx, instance)?;

    svc.delete_category(id)
        .await
        .map_err(domain_problem(instance))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// List the books in one category.
#[tracing::instrument(skip_all, fields(category_id = %id))]
pub async fn list_category_books(
    Extension(ctx): Extension<AuthContext>,
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let instance = uri.path();
    let media = negotiate(&headers, instance)?;
    let page_req = svc
        .page_request(params.page, params.size)
        .map_err(domain_problem(instance))?;

    let page = svc
        .list_category_books(id, page_req)
        .await
        .map_err(domain_problem(instance))?
        .map_items(BookDto::from);

    let links = LinkBuilder::new(BOOK_ROUTES);
    shaped_page_response(&page, params.fields.as_deref(), media, &ctx, &links, instance)
}
