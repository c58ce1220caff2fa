//! Unified error type for the shaping and encoding pipeline.

/// Errors surfaced by the shaping, negotiation, and encoding components.
///
/// `UnknownProperty` is a defensive invariant check: [`crate::FieldSet`]
/// resolution only yields declared property names, so hitting it means field
/// resolution upstream drifted from the entity definition, not that the
/// client sent bad input. Unmatched client field names are dropped during
/// resolution and never error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml encoding failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
