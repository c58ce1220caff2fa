//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Pure data model plus optional axum integration (behind the `axum`
//! feature). Handlers build a [`Problem`] from domain or pipeline errors and
//! return it; the response carries `application/problem+json`.

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct Problem {
    /// A URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence. Serializes as u16.
    #[serde(
        serialize_with = "serialize_status",
        deserialize_with = "deserialize_status"
    )]
    pub status: StatusCode,
    /// A human-readable explanation specific to this occurrence.
    pub detail: String,
    /// A URI reference identifying this specific occurrence.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub instance: String,
    /// Optional machine-readable application error code.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
    /// Optional trace id for correlating with logs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trace_id: Option<String>,
    /// Optional per-field validation violations for 4xx problems.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub violations: Option<Vec<Violation>>,
}

/// Individual validation violation for a specific field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Field path, e.g. `price` or `book.title`.
    pub field: String,
    /// Human-readable message describing the violation.
    pub message: String,
}

impl Problem {
    /// Create a new Problem with the given status, title, and detail.
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: None,
            trace_id: None,
            violations: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.violations = Some(violations);
        self
    }
}

/// 400 Bad Request.
pub fn bad_request(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail)
}

/// 403 Forbidden.
pub fn forbidden(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::FORBIDDEN, "Forbidden", detail)
}

/// 404 Not Found.
pub fn not_found(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", detail)
}

/// 406 Not Acceptable.
pub fn not_acceptable(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::NOT_ACCEPTABLE, "Not Acceptable", detail)
}

/// 422 Unprocessable Entity.
pub fn unprocessable(detail: impl Into<String>) -> Problem {
    Problem::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Unprocessable Entity",
        detail,
    )
}

/// 500 Internal Server Error.
pub fn internal_error(detail: impl Into<String>) -> Problem {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        detail,
    )
}

/// Axum integration: make Problem directly usable as a response.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::HeaderValue;

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_optional_fields() {
        let p = unprocessable("price out of range")
            .with_code("PRICE_OUT_OF_RANGE")
            .with_instance("/api/books")
            .with_violations(vec![Violation {
                field: "price".to_owned(),
                message: "must be between 10 and 1000".to_owned(),
            }]);

        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(p.code.as_deref(), Some("PRICE_OUT_OF_RANGE"));
        assert_eq!(p.instance, "/api/books");
        assert_eq!(p.violations.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn status_serializes_as_u16() {
        let p = not_found("no such book");
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"status\":404"));
    }

    #[test]
    fn status_deserializes_from_u16() {
        let json = r#"{"type":"about:blank","title":"Not Found","status":404,"detail":"x"}"#;
        let p: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, StatusCode::NOT_FOUND);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn into_response_sets_status_and_content_type() {
        use axum::response::IntoResponse;

        let resp = not_acceptable("no encoder for media type").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
        let ct = resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }
}
