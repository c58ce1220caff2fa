//! Response shaping and hypermedia pipeline for the Bookshelf API.
//!
//! Turns a page of typed entities into bytes on the wire in four steps:
//!
//! 1. [`FieldSet`] resolves the client's field-selection string against the
//!    entity's declared properties.
//! 2. [`shape`]/[`shape_all`] project entities down to the selected fields,
//!    producing ordered [`ShapedEntity`] mappings.
//! 3. [`EnvelopeAssembler`] decides — once, from the negotiated media type —
//!    whether the payload carries hypermedia links, and attaches pagination
//!    metadata to a response header rather than the body.
//! 4. [`encode`] serializes the assembled envelope as JSON, XML, or CSV.
//!
//! All components are pure functions over their inputs; collaborators (link
//! builder, auth context, pagination metadata) are passed explicitly.

pub mod encode;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod links;
pub mod media;
pub mod page;
pub mod problem_mapping;
pub mod shape;

pub use encode::encode;
pub use envelope::{Body, Envelope, EnvelopeAssembler, LinkEnvelope, LinkedEntity};
pub use error::Error;
pub use fields::FieldSet;
pub use links::{AuthContext, Link, LinkBuilder, ResourceRoutes, Role, SubResource};
pub use media::{HATEOAS_JSON, HATEOAS_XML, MediaType, WireFormat};
pub use page::{PAGINATION_HEADER, Page, PageMeta};
pub use problem_mapping::error_to_problem;
pub use shape::{FieldValue, Shapeable, ShapedEntity, output_columns, shape, shape_all};
