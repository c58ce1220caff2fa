//! Request-scoped authorization context.
//!
//! Identity is an upstream concern: a gateway terminates authentication and
//! forwards the resolved roles in headers. This layer only parses those
//! headers into an [`AuthContext`] for handlers and the link builder; absent
//! or unparseable headers degrade to an anonymous, read-only caller.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use bookshelf_hypermedia::{AuthContext, Role};
use http::HeaderMap;

/// Comma-separated roles resolved by the upstream identity layer.
pub const ROLES_HEADER: &str = "x-roles";
/// Subject identifier resolved by the upstream identity layer.
pub const SUBJECT_HEADER: &str = "x-subject";

/// Parse the forwarded identity headers. Unknown role names are ignored.
#[must_use]
pub fn auth_context_from_headers(headers: &HeaderMap) -> AuthContext {
    let subject = headers
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let roles: Vec<Role> = headers
        .get(ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.split(',').filter_map(Role::parse).collect())
        .unwrap_or_default();

    AuthContext { subject, roles }
}

/// Middleware attaching the caller's [`AuthContext`] to request extensions.
pub async fn attach_auth_context(mut req: Request, next: Next) -> Response {
    let ctx = auth_context_from_headers(req.headers());
    req.extensions_mut().insert(ctx);
    next.run(req).await
}
