//! Media-type negotiation.
//!
//! The negotiated media type decides two independent things: the wire format
//! (JSON, XML, CSV) and whether the payload is wrapped with hypermedia links.
//! The hypermedia decision is made here, once, before assembly — never at
//! encode time. Unrecognized types fail with `UnsupportedMediaType`, which
//! surfaces as 406 before any response byte is written.

use crate::error::Error;

/// Vendor media type for hypermedia JSON responses.
pub const HATEOAS_JSON: &str = "application/vnd.bookshelf.hateoas+json";
/// Vendor media type for hypermedia XML responses.
pub const HATEOAS_XML: &str = "application/vnd.bookshelf.hateoas+xml";

/// The wire format of a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Xml,
    Csv,
}

/// A negotiated media type: base format plus hypermedia flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct MediaType {
    pub format: WireFormat,
    pub hypermedia: bool,
}

impl MediaType {
    /// Resolve a single media-type string.
    ///
    /// Recognized: `application/json`, `text/json`, `application/xml`,
    /// `text/xml`, `text/csv`, the vendor hypermedia variants, and `*/*`
    /// (JSON). Parameters (`;q=`, `;charset=`) are ignored. There is no
    /// hypermedia CSV variant: links are not representable in tabular form.
    ///
    /// # Errors
    /// `Error::UnsupportedMediaType` for anything else.
    pub fn negotiate(media_type: &str) -> Result<Self, Error> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "" | "*/*" | "application/json" | "text/json" | "application/*" => Ok(Self {
                format: WireFormat::Json,
                hypermedia: false,
            }),
            HATEOAS_JSON => Ok(Self {
                format: WireFormat::Json,
                hypermedia: true,
            }),
            "application/xml" | "text/xml" => Ok(Self {
                format: WireFormat::Xml,
                hypermedia: false,
            }),
            HATEOAS_XML => Ok(Self {
                format: WireFormat::Xml,
                hypermedia: true,
            }),
            "text/csv" => Ok(Self {
                format: WireFormat::Csv,
                hypermedia: false,
            }),
            _ => Err(Error::UnsupportedMediaType(media_type.trim().to_owned())),
        }
    }

    /// Resolve an `Accept` header that may list several media ranges.
    ///
    /// Candidates are tried in listed order; the first supported one wins.
    /// A missing or empty header defaults to JSON.
    ///
    /// # Errors
    /// `Error::UnsupportedMediaType` when no listed range is supported.
    pub fn from_accept_header(accept: Option<&str>) -> Result<Self, Error> {
        let Some(accept) = accept.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self {
                format: WireFormat::Json,
                hypermedia: false,
            });
        };

        accept
            .split(',')
            .map(Self::negotiate)
            .find_map(Result::ok)
            .ok_or_else(|| Error::UnsupportedMediaType(accept.to_owned()))
    }

    /// The `content-type` value for responses in this media type.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match (self.format, self.hypermedia) {
            (WireFormat::Json, false) => "application/json",
            (WireFormat::Json, true) => HATEOAS_JSON,
            (WireFormat::Xml, false) => "application/xml",
            (WireFormat::Xml, true) => HATEOAS_XML,
            (WireFormat::Csv, _) => "text/csv",
        }
    }
}
