//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every handler annotated with `#[utoipa::path]`, the
//! schema wrappers for domain types, and two security schemes:
//!
//! - `ClientBasic`: HTTP Basic client authentication on `POST /oauth/token`;
//! - `BearerToken`: access tokens issued by that endpoint.
//!
//! Swagger UI serves it in debug builds; `openapi-dump` prints it.

use crate::inbound::http::events::{
    EmbeddedEvents, EventCollection, EventPayload, EventResource, ManagerRef, ViolationReport,
};
use crate::inbound::http::hal::Link;
use crate::inbound::http::index::IndexResource;
use crate::inbound::http::oauth::{OAuthErrorResponse, TokenForm, TokenResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, PageMetadataSchema, ViolationSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Register the client and bearer authentication schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ClientBasic",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Basic)
                    .description(Some("Registered OAuth2 client id and secret."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("opaque")
                    .description(Some("Access token issued by POST /oauth/token."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Events API",
        description = "Hypermedia API for publishing events, secured with OAuth2 password-grant tokens."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::oauth::issue_token,
        crate::inbound::http::index::index,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ViolationSchema,
        PageMetadataSchema,
        EventPayload,
        EventResource,
        EventCollection,
        EmbeddedEvents,
        ManagerRef,
        ViolationReport,
        Link,
        IndexResource,
        TokenForm,
        TokenResponse,
        OAuthErrorResponse,
    )),
    tags(
        (name = "events", description = "Create, browse and update events"),
        (name = "oauth", description = "Token issuance"),
        (name = "index", description = "API entry point"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema is registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    fn every_event_operation_is_documented() {
        let doc = ApiDoc::openapi();
        let operation_ids: Vec<String> = doc
            .paths
            .paths
            .values()
            .flat_map(|item| {
                [&item.get, &item.post, &item.put]
                    .into_iter()
                    .flatten()
                    .filter_map(|operation| operation.operation_id.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        for id in ["createEvent", "listEvents", "getEvent", "updateEvent", "issueToken"] {
            assert!(operation_ids.iter().any(|found| found == id), "missing {id}");
        }
    }

    #[rstest]
    fn event_payload_uses_wire_names() {
        let fields = object_fields("EventPayload");
        for field in ["name", "beginEnrollmentDateTime", "limitOfEnrollment"] {
            assert!(fields.iter().any(|found| found == field), "missing {field}");
        }
        assert!(!fields.iter().any(|found| found == "free"));
    }

    #[rstest]
    fn event_resource_exposes_derived_flags_and_links() {
        let fields = object_fields("EventResource");
        for field in ["free", "offline", "eventStatus", "_links"] {
            assert!(fields.iter().any(|found| found == field), "missing {field}");
        }
    }

    #[rstest]
    fn both_security_schemes_are_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
        assert!(components.security_schemes.contains_key("ClientBasic"));
    }
}
