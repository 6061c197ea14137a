//! Request decoding failures for the HTTP adapter.
//!
//! Body, path and query problems that happen before a handler runs are
//! mapped onto the domain [`Error`] so they share the JSON envelope and
//! trace header of every other failure.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use pagination::{PageRequest, PaginationError};
use serde_json::json;

use crate::domain::{Error, EventId};

/// Largest accepted JSON body.
const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Machine-readable reasons attached to `invalid_request` details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MalformedBody,
    UnknownField,
    InvalidValue,
    UnsupportedMediaType,
    PayloadTooLarge,
    InvalidPage,
    InvalidSize,
    InvalidSort,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MalformedBody => "malformed_body",
            Self::UnknownField => "unknown_field",
            Self::InvalidValue => "invalid_value",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InvalidPage => "invalid_page",
            Self::InvalidSize => "invalid_size",
            Self::InvalidSort => "invalid_sort",
        }
    }
}

fn invalid(code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

fn invalid_param(code: ErrorCode, param: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": param,
        "code": code.as_str(),
    }))
}

/// Classify a serde failure raised while deserialising a JSON body.
fn classify_serde(err: &serde_json::Error) -> ErrorCode {
    use serde_json::error::Category;

    match err.classify() {
        Category::Data if err.to_string().starts_with("unknown field") => ErrorCode::UnknownField,
        Category::Data => ErrorCode::InvalidValue,
        Category::Syntax | Category::Eof | Category::Io => ErrorCode::MalformedBody,
    }
}

pub(crate) fn json_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::Deserialize(inner) => {
            invalid(classify_serde(inner), format!("invalid request body: {inner}"))
        }
        JsonPayloadError::ContentType => invalid(
            ErrorCode::UnsupportedMediaType,
            "request body must be application/json",
        ),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            invalid(
                ErrorCode::PayloadTooLarge,
                format!("request body exceeds {limit} bytes"),
            )
        }
        other => invalid(ErrorCode::MalformedBody, format!("invalid request body: {other}")),
    }
}

/// JSON extractor configuration used by every JSON endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req: &HttpRequest| json_error(&err).into())
}

/// Parse the `{id}` path segment. Identifiers that cannot exist are reported
/// as missing resources.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, Error> {
    raw.trim()
        .parse::<i64>()
        .map(EventId::new)
        .map_err(|_| Error::not_found(format!("event {raw} not found")))
}

/// Parse `page`, `size` and `sort` from a raw query string.
pub(crate) fn page_request(query: &str) -> Result<PageRequest, Error> {
    PageRequest::from_query(query).map_err(|err| {
        let (code, param) = match &err {
            PaginationError::InvalidPage { .. } => (ErrorCode::InvalidPage, "page"),
            PaginationError::InvalidSize { .. } => (ErrorCode::InvalidSize, "size"),
            PaginationError::InvalidSort { .. } => (ErrorCode::InvalidSort, "sort"),
        };
        invalid_param(code, param, err.to_string())
    })
}
