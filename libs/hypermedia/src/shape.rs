//! Entity shaping: projecting a typed entity down to the requested fields.
//!
//! The output schema is decided per request, so shaped records are ordered
//! name → value mappings rather than fixed structs. Encoders operate
//! generically over the mapping; they never see the original entity type.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

use crate::error::Error;
use crate::fields::FieldSet;

/// A scalar value of a shaped field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Uuid(Uuid),
}

impl FieldValue {
    /// Plain-text rendering for tabular and element encodings.
    /// `Null` renders as the empty string.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            FieldValue::Str(s) => s.clone(),
            FieldValue::Uuid(u) => u.to_string(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::Float(n) => serializer.serialize_f64(*n),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Uuid(u) => u.serialize(serializer),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        FieldValue::Uuid(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// An entity type that can be shaped.
///
/// `declared_fields` is the fixed, ordered property list a selection string
/// is resolved against; `field_value` reads one property by declared name.
pub trait Shapeable {
    /// Singular resource name, used for XML element names and link rels.
    fn resource_name() -> &'static str;

    /// All declared property names, in canonical output order.
    fn declared_fields() -> &'static [&'static str];

    /// The primary-key property name.
    fn key_field() -> &'static str {
        "id"
    }

    /// Read a property by declared name. `None` for undeclared names.
    fn field_value(&self, name: &str) -> Option<FieldValue>;
}

/// A per-request projection of one entity: its key plus an ordered mapping
/// of the selected properties.
///
/// The key property is always part of the mapping (prepended when not
/// explicitly selected) so every serialized record carries its identifier,
/// and it is additionally kept aside for link construction.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct ShapedEntity {
    key: FieldValue,
    fields: IndexMap<String, FieldValue>,
}

impl ShapedEntity {
    /// The entity's primary-key value.
    pub fn key(&self) -> &FieldValue {
        &self.key
    }

    /// The selected properties, in output order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

impl Serialize for ShapedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Project one entity down to the selected fields.
///
/// The mapping lists the key property first when it was not explicitly
/// selected, then the selected properties in `fields` order.
///
/// # Errors
/// `Error::UnknownProperty` if a resolved name is not readable on the entity.
/// With a `FieldSet` resolved against the same type this is unreachable; the
/// check guards against drift between declared fields and `field_value`.
pub fn shape<T: Shapeable>(entity: &T, fields: &FieldSet) -> Result<ShapedEntity, Error> {
    let key_field = T::key_field();
    let key = entity
        .field_value(key_field)
        .ok_or_else(|| Error::UnknownProperty(key_field.to_owned()))?;

    let mut map = IndexMap::with_capacity(fields.len() + 1);
    if !fields.contains(key_field) {
        map.insert(key_field.to_owned(), key.clone());
    }
    for name in fields.iter() {
        let value = entity
            .field_value(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_owned()))?;
        map.insert(name.to_owned(), value);
    }

    Ok(ShapedEntity { key, fields: map })
}

/// Shape a sequence of entities against one `FieldSet`.
///
/// Length- and order-preserving: the output has one record per input entity,
/// in input order, all shaped against the same selection.
///
/// # Errors
/// Propagates the first `Error::UnknownProperty` from [`shape`].
pub fn shape_all<T: Shapeable>(entities: &[T], fields: &FieldSet) -> Result<Vec<ShapedEntity>, Error> {
    entities.iter().map(|e| shape(e, fields)).collect()
}

/// The output column list a selection produces: the key property first when
/// not selected, then the selection in order. Matches the mapping order of
/// every record [`shape`] emits for this selection.
#[must_use]
pub fn output_columns<T: Shapeable>(fields: &FieldSet) -> Vec<String> {
    let key_field = T::key_field();
    let mut columns = Vec::with_capacity(fields.len() + 1);
    if !fields.contains(key_field) {
        columns.push(key_field.to_owned());
    }
    columns.extend(fields.iter().map(str::to_owned));
    columns
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Book {
        id: i64,
        title: String,
        price: f64,
    }

    impl Shapeable for Book {
        fn resource_name() -> &'static str {
            "book"
        }

        fn declared_fields() -> &'static [&'static str] {
            &["id", "title", "price"]
        }

        fn field_value(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some(self.title.as_str().into()),
                "price" => Some(self.price.into()),
                _ => None,
            }
        }
    }

    fn go_in_action() -> Book {
        Book {
            id: 1,
            title: "Go in Action".to_owned(),
            price: 35.0,
        }
    }

    #[test]
    fn selecting_title_retains_id_for_linking() {
        let fields = FieldSet::resolve(Some("title"), Book::declared_fields());
        let shaped = shape(&go_in_action(), &fields).unwrap();

        let names: Vec<&str> = shaped.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "title"]);
        assert_eq!(shaped.get("title"), Some(&FieldValue::Str("Go in Action".into())));
        assert_eq!(shaped.get("price"), None);
        assert_eq!(shaped.key(), &FieldValue::Int(1));
    }

    #[test]
    fn empty_selection_yields_all_declared_fields_in_order() {
        let fields = FieldSet::resolve(None, Book::declared_fields());
        let shaped = shape(&go_in_action(), &fields).unwrap();

        let names: Vec<&str> = shaped.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "title", "price"]);
    }

    #[test]
    fn explicit_key_selection_keeps_requested_position() {
        let fields = FieldSet::resolve(Some("title,id"), Book::declared_fields());
        let shaped = shape(&go_in_action(), &fields).unwrap();

        let names: Vec<&str> = shaped.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["title", "id"]);
    }

    #[test]
    fn shaping_a_sequence_preserves_length_and_order() {
        let books = vec![
            Book {
                id: 1,
                title: "a".to_owned(),
                price: 10.0,
            },
            Book {
                id: 2,
                title: "b".to_owned(),
                price: 20.0,
            },
        ];
        let fields = FieldSet::resolve(Some("title"), Book::declared_fields());
        let shaped = shape_all(&books, &fields).unwrap();

        assert_eq!(shaped.len(), 2);
        assert_eq!(shaped[0].key(), &FieldValue::Int(1));
        assert_eq!(shaped[1].key(), &FieldValue::Int(2));
    }

    #[test]
    fn serializes_as_bare_mapping_in_insertion_order() {
        let fields = FieldSet::resolve(Some("title"), Book::declared_fields());
        let shaped = shape(&go_in_action(), &fields).unwrap();

        let json = serde_json::to_string(&shaped).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"Go in Action"}"#);
    }

    #[test]
    fn output_columns_match_shaped_record_order() {
        let fields = FieldSet::resolve(Some("price,title"), Book::declared_fields());
        let columns = output_columns::<Book>(&fields);
        let shaped = shape(&go_in_action(), &fields).unwrap();

        let names: Vec<String> = shaped.fields().keys().cloned().collect();
        assert_eq!(columns, names);
    }

    #[test]
    fn null_and_render_behavior() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::Null.render(), "");
        assert_eq!(FieldValue::Float(35.0).render(), "35");
        assert_eq!(FieldValue::Bool(true).render(), "true");
    }
}
