//! Mapping of pipeline errors to RFC 9457 Problem responses.
//!
//! `UnsupportedMediaType` is the only client-visible condition (406); the
//! rest indicate internal faults and map to 500 without leaking detail.

use bookshelf_problem::{Problem, internal_error, not_acceptable};

use crate::error::Error;

/// Map a pipeline error to a Problem, tagging it with the request path.
pub fn error_to_problem(error: &Error, instance: &str) -> Problem {
    match error {
        Error::UnsupportedMediaType(given) => {
            not_acceptable(format!("no encoder for media type '{given}'"))
                .with_code("UNSUPPORTED_MEDIA_TYPE")
                .with_instance(instance)
        }
        Error::UnknownProperty(name) => {
            tracing::error!(property = %name, "field resolution drifted from entity definition");
            internal_error("response shaping failed")
                .with_code("UNKNOWN_PROPERTY")
                .with_instance(instance)
        }
        Error::Json(_) | Error::Xml(_) | Error::Csv(_) | Error::Io(_) => {
            tracing::error!(error = %error, "response encoding failed");
            internal_error("response encoding failed").with_instance(instance)
        }
    }
}
