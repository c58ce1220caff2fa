//! Envelope assembly.
//!
//! The sole place content negotiation affects payload *shape*: the assembler
//! decides once, from the negotiated media type, whether shaped records are
//! returned bare or wrapped with per-entity and collection-level links. The
//! decision is encoded in the [`Body`] sum type so encoders match on an
//! explicit variant instead of sniffing shapes at encode time.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::links::{AuthContext, Link, LinkBuilder};
use crate::media::MediaType;
use crate::page::PageMeta;
use crate::shape::ShapedEntity;

/// One shaped record plus its navigation links.
#[derive(Clone, Debug)]
#[must_use]
pub struct LinkedEntity {
    pub entity: ShapedEntity,
    pub links: Vec<Link>,
}

impl Serialize for LinkedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entity.fields().len() + 1))?;
        for (name, value) in self.entity.fields() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("links", &self.links)?;
        map.end()
    }
}

/// A linked collection: per-entity link lists plus collection-level links.
#[derive(Clone, Debug, Serialize)]
#[must_use]
pub struct LinkEnvelope {
    pub value: Vec<LinkedEntity>,
    pub links: Vec<Link>,
}

/// The assembled payload. Single resources serialize as one object on the
/// wire, collections as a sequence; collection-level links exist only on
/// `LinkedCollection`.
#[derive(Clone, Debug)]
pub enum Body {
    Item(ShapedEntity),
    Collection(Vec<ShapedEntity>),
    LinkedItem(LinkedEntity),
    LinkedCollection(LinkEnvelope),
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Body::Item(entity) => entity.serialize(serializer),
            Body::Collection(entities) => entities.serialize(serializer),
            Body::LinkedItem(linked) => linked.serialize(serializer),
            Body::LinkedCollection(envelope) => envelope.serialize(serializer),
        }
    }
}

/// An assembled response: the payload plus the resource labels and output
/// column list the tabular and element encoders need (columns allow a CSV
/// header even for an empty page).
#[derive(Clone, Debug)]
#[must_use]
pub struct Envelope {
    /// Singular resource label (`book`), used for XML item elements.
    pub resource: &'static str,
    /// Collection label (`books`), used for XML roots.
    pub collection: &'static str,
    /// Output columns every record in this response was shaped against.
    pub columns: Vec<String>,
    pub body: Body,
}

/// Assembles envelopes for one resource type and one negotiated media type.
///
/// Collaborators are passed in explicitly; the assembler holds no state
/// beyond the request's negotiation outcome.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct EnvelopeAssembler<'a> {
    links: &'a LinkBuilder,
    media: MediaType,
}

impl<'a> EnvelopeAssembler<'a> {
    pub fn new(links: &'a LinkBuilder, media: MediaType) -> Self {
        Self { links, media }
    }

    /// Assemble a single-resource response. No collection-level links are
    /// attached in either branch.
    pub fn one(&self, columns: Vec<String>, entity: ShapedEntity, authz: &AuthContext) -> Envelope {
        let body = if self.media.hypermedia {
            let links = self.links.entity_links(entity.key(), authz);
            Body::LinkedItem(LinkedEntity { entity, links })
        } else {
            Body::Item(entity)
        };
        self.envelope(columns, body)
    }

    /// Assemble a collection response. In the hypermedia branch every record
    /// gets its own link list and the envelope carries collection-level
    /// navigation links derived from the page position.
    pub fn collection(
        &self,
        columns: Vec<String>,
        entities: Vec<ShapedEntity>,
        authz: &AuthContext,
        meta: &PageMeta,
        fields: Option<&str>,
    ) -> Envelope {
        let body = if self.media.hypermedia {
            let value = entities
                .into_iter()
                .map(|entity| {
                    let links = self.links.entity_links(entity.key(), authz);
                    LinkedEntity { entity, links }
                })
                .collect();
            Body::LinkedCollection(LinkEnvelope {
                value,
                links: self.links.collection_links(meta, fields),
            })
        } else {
            Body::Collection(entities)
        };
        self.envelope(columns, body)
    }

    fn envelope(&self, columns: Vec<String>, body: Body) -> Envelope {
        Envelope {
            resource: self.links.resource(),
            collection: self.links.collection_label(),
            columns,
            body,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fields::FieldSet;
    use crate::links::{ResourceRoutes, Role};
    use crate::media::HATEOAS_JSON;
    use crate::shape::{FieldValue, Shapeable, shape};

    struct Book {
        id: i64,
        title: &'static str,
    }

    impl Shapeable for Book {
        fn resource_name() -> &'static str {
            "book"
        }

        fn declared_fields() -> &'static [&'static str] {
            &["id", "title"]
        }

        fn field_value(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some(self.title.into()),
                _ => None,
            }
        }
    }

    const ROUTES: ResourceRoutes = ResourceRoutes {
        resource: "book",
        collection_path: "/api/books",
        sub_resource: None,
    };

    fn shaped(id: i64, title: &'static str) -> ShapedEntity {
        let fields = FieldSet::full(Book::declared_fields());
        shape(&Book { id, title }, &fields).unwrap()
    }

    fn columns() -> Vec<String> {
        vec!["id".to_owned(), "title".to_owned()]
    }

    #[test]
    fn plain_media_type_yields_bare_collection() {
        let builder = LinkBuilder::new(ROUTES);
        let media = MediaType::negotiate("application/json").unwrap();
        let assembler = EnvelopeAssembler::new(&builder, media);

        let envelope = assembler.collection(
            columns(),
            vec![shaped(1, "a")],
            &AuthContext::anonymous(),
            &PageMeta::new(1, 10, 1),
            None,
        );

        assert!(matches!(envelope.body, Body::Collection(ref items) if items.len() == 1));
        assert_eq!(envelope.collection, "books");
    }

    #[test]
    fn hypermedia_media_type_wraps_with_links() {
        let builder = LinkBuilder::new(ROUTES);
        let media = MediaType::negotiate(HATEOAS_JSON).unwrap();
        let assembler = EnvelopeAssembler::new(&builder, media);

        let envelope = assembler.collection(
            columns(),
            vec![shaped(1, "a"), shaped(2, "b")],
            &AuthContext::new("ed", vec![Role::Editor]),
            &PageMeta::new(2, 10, 50),
            None,
        );

        let Body::LinkedCollection(env) = envelope.body else {
            panic!("expected linked collection");
        };
        assert_eq!(env.value.len(), 2);
        // every record carries at least a self link
        assert!(env.value.iter().all(|l| l.links[0].rel == "self"));
        // page 2 of 5: both directions present
        let rels: Vec<&str> = env.links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["self", "next_page", "previous_page"]);
    }

    #[test]
    fn single_resource_envelope_has_no_collection_links() {
        let builder = LinkBuilder::new(ROUTES);
        let media = MediaType::negotiate(HATEOAS_JSON).unwrap();
        let assembler = EnvelopeAssembler::new(&builder, media);

        let envelope = assembler.one(columns(), shaped(1, "a"), &AuthContext::anonymous());

        let Body::LinkedItem(linked) = envelope.body else {
            panic!("expected linked item");
        };
        assert_eq!(linked.links[0].rel, "self");
    }

    #[test]
    fn linked_entity_serializes_fields_then_links() {
        let builder = LinkBuilder::new(ROUTES);
        let links = builder.entity_links(&FieldValue::Int(1), &AuthContext::anonymous());
        let linked = LinkedEntity {
            entity: shaped(1, "a"),
            links,
        };

        let json = serde_json::to_string(&linked).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"title":"a","links":[{"href":"/api/books/1","rel":"self","method":"GET"}]}"#
        );
    }
}
