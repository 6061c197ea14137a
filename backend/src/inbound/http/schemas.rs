//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `ToSchema`; the wrappers below mirror their
//! serialised shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backing store is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "invalid request body: unknown field `id`")]
    message: String,
    /// Request correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Violation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Violation)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ViolationSchema {
    #[schema(example = "eventDto")]
    object_name: String,
    /// Offending field; absent for object-level violations.
    #[schema(example = "endEventDateTime")]
    field: Option<String>,
    #[schema(example = "wrongValue")]
    code: String,
    #[schema(example = "endEventDateTime must not be before beginEventDateTime")]
    default_message: String,
    rejected_value: Option<String>,
}

/// OpenAPI schema for [`pagination::PageMetadata`].
#[derive(ToSchema)]
#[schema(as = pagination::PageMetadata)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetadataSchema {
    #[schema(example = 20)]
    size: u32,
    #[schema(example = 42)]
    total_elements: u64,
    #[schema(example = 3)]
    total_pages: u64,
    /// Zero-based page index.
    #[schema(example = 0)]
    number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }

    #[test]
    fn violation_schema_matches_wire_names() {
        let schema_json = schema_to_json::<ViolationSchema>();
        for field in ["objectName", "defaultMessage", "rejectedValue"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
