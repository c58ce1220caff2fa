//! Hypermedia link construction.
//!
//! Links are built per request from the resource's route template family and
//! the caller's authorization context. Rule order is fixed so serialized
//! output is deterministic: `self`, then the role-gated mutation links, then
//! the sub-resource link; for collections `self`, then `next_page` /
//! `previous_page` where more pages exist.

use http::Method;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::page::PageMeta;
use crate::shape::FieldValue;

/// A hypermedia navigation link.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: Method,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: Method) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method,
        }
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Link", 3)?;
        s.serialize_field("href", &self.href)?;
        s.serialize_field("rel", &self.rel)?;
        s.serialize_field("method", self.method.as_str())?;
        s.end()
    }
}

/// Caller roles, as resolved by the identity collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Reader,
    Editor,
    Admin,
}

impl Role {
    /// Parse a role name case-insensitively. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reader" => Some(Role::Reader),
            "editor" => Some(Role::Editor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Read-only view of the caller's identity and roles.
///
/// Consumed by the link builder to gate mutation links and by handlers to
/// gate the mutation routes themselves.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct AuthContext {
    pub subject: Option<String>,
    pub roles: Vec<Role>,
}

impl AuthContext {
    /// An unauthenticated caller: read-only access.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(subject: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            subject: Some(subject.into()),
            roles,
        }
    }

    /// Whether the caller may create, update, or delete resources.
    #[must_use]
    pub fn can_modify(&self) -> bool {
        self.roles
            .iter()
            .any(|r| matches!(r, Role::Editor | Role::Admin))
    }
}

/// A navigable sub-collection of a resource, e.g. a book's category.
#[derive(Clone, Copy, Debug)]
pub struct SubResource {
    /// Rel suffix: `get_<rel>`.
    pub rel: &'static str,
    /// Path segment appended after the entity key.
    pub segment: &'static str,
}

/// Route template family for one resource type.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct ResourceRoutes {
    /// Singular resource name used in rels (`update_book`).
    pub resource: &'static str,
    /// Canonical collection path, no trailing slash (`/api/books`).
    pub collection_path: &'static str,
    /// Optional navigable sub-collection.
    pub sub_resource: Option<SubResource>,
}

impl ResourceRoutes {
    /// Collection element label: the last path segment (`books`).
    #[must_use]
    pub fn collection_label(&self) -> &'static str {
        self.collection_path
            .rsplit('/')
            .next()
            .unwrap_or(self.resource)
    }
}

/// Builds entity- and collection-level links for one resource type.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct LinkBuilder {
    routes: ResourceRoutes,
}

impl LinkBuilder {
    pub const fn new(routes: ResourceRoutes) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.routes.resource
    }

    #[must_use]
    pub fn collection_label(&self) -> &'static str {
        self.routes.collection_label()
    }

    fn entity_href(&self, key: &FieldValue) -> String {
        format!("{}/{}", self.routes.collection_path, key.render())
    }

    /// Links for one entity, in fixed rule order. `self` is always present;
    /// `update_*`/`delete_*` only when the caller may modify; the
    /// sub-resource link when one is configured.
    pub fn entity_links(&self, key: &FieldValue, authz: &AuthContext) -> Vec<Link> {
        let href = self.entity_href(key);
        let mut links = vec![Link::new(href.clone(), "self", Method::GET)];

        if authz.can_modify() {
            links.push(Link::new(
                href.clone(),
                format!("update_{}", self.routes.resource),
                Method::PUT,
            ));
            links.push(Link::new(
                href.clone(),
                format!("delete_{}", self.routes.resource),
                Method::DELETE,
            ));
        }

        if let Some(sub) = self.routes.sub_resource {
            links.push(Link::new(
                format!("{href}/{}", sub.segment),
                format!("get_{}", sub.rel),
                Method::GET,
            ));
        }

        links
    }

    fn page_href(&self, page: u64, meta: &PageMeta, fields: Option<&str>) -> String {
        let mut href = format!(
            "{}?page={page}&size={}",
            self.routes.collection_path, meta.page_size
        );
        if let Some(fields) = fields {
            href.push_str("&fields=");
            href.push_str(fields);
        }
        href
    }

    /// Collection-level links: `self`, then `next_page` / `previous_page`
    /// where pages exist in that direction. `fields` echoes the caller's
    /// selection so navigation preserves the requested shape.
    pub fn collection_links(&self, meta: &PageMeta, fields: Option<&str>) -> Vec<Link> {
        let mut links = vec![Link::new(
            self.page_href(meta.current_page, meta, fields),
            "self",
            Method::GET,
        )];

        if meta.has_next() {
            links.push(Link::new(
                self.page_href(meta.current_page + 1, meta, fields),
                "next_page",
                Method::GET,
            ));
        }
        if meta.has_previous() {
            links.push(Link::new(
                self.page_href(meta.current_page - 1, meta, fields),
                "previous_page",
                Method::GET,
            ));
        }

        links
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BOOK_ROUTES: ResourceRoutes = ResourceRoutes {
        resource: "book",
        collection_path: "/api/books",
        sub_resource: Some(SubResource {
            rel: "category",
            segment: "category",
        }),
    };

    fn editor() -> AuthContext {
        AuthContext::new("ed", vec![Role::Editor])
    }

    #[test]
    fn reader_gets_self_and_subresource_only() {
        let builder = LinkBuilder::new(BOOK_ROUTES);
        let links = builder.entity_links(&FieldValue::Int(7), &AuthContext::anonymous());

        let rels: Vec<&str> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["self", "get_category"]);
        assert_eq!(links[0].href, "/api/books/7");
        assert_eq!(links[1].href, "/api/books/7/category");
    }

    #[test]
    fn editor_gets_mutation_links_in_fixed_order() {
        let builder = LinkBuilder::new(BOOK_ROUTES);
        let links = builder.entity_links(&FieldValue::Int(7), &editor());

        let rels: Vec<&str> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["self", "update_book", "delete_book", "get_category"]);
        assert_eq!(links[1].method, Method::PUT);
        assert_eq!(links[2].method, Method::DELETE);
    }

    #[test]
    fn middle_page_links_both_directions() {
        let builder = LinkBuilder::new(BOOK_ROUTES);
        let meta = PageMeta::new(2, 10, 50);
        let links = builder.collection_links(&meta, None);

        let rels: Vec<&str> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["self", "next_page", "previous_page"]);
        assert_eq!(links[1].href, "/api/books?page=3&size=10");
        assert_eq!(links[2].href, "/api/books?page=1&size=10");
    }

    #[test]
    fn edge_pages_omit_missing_directions() {
        let builder = LinkBuilder::new(BOOK_ROUTES);

        let first = builder.collection_links(&PageMeta::new(1, 10, 50), None);
        assert!(first.iter().all(|l| l.rel != "previous_page"));

        let last = builder.collection_links(&PageMeta::new(5, 10, 50), None);
        assert!(last.iter().all(|l| l.rel != "next_page"));
    }

    #[test]
    fn collection_links_echo_field_selection() {
        let builder = LinkBuilder::new(BOOK_ROUTES);
        let links = builder.collection_links(&PageMeta::new(1, 10, 50), Some("title"));
        assert_eq!(links[0].href, "/api/books?page=1&size=10&fields=title");
    }

    #[test]
    fn link_serializes_method_as_string() {
        let link = Link::new("/api/books/1", "self", Method::GET);
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(
            json,
            r#"{"href":"/api/books/1","rel":"self","method":"GET"}"#
        );
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" editor "), Some(Role::Editor));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn can_modify_requires_editor_or_admin() {
        assert!(!AuthContext::anonymous().can_modify());
        assert!(!AuthContext::new("r", vec![Role::Reader]).can_modify());
        assert!(AuthContext::new("a", vec![Role::Admin]).can_modify());
    }
}
