//! Event resource handlers.
//!
//! ```text
//! POST /api/events            create (bearer token required)
//! GET  /api/events            page through events
//! GET  /api/events/{id}       fetch one event
//! PUT  /api/events/{id}       replace an event (manager only)
//! ```
//!
//! Responses are HAL documents. Payloads are checked by
//! [`EventDetails::try_from_draft`] before any port is called; failures come
//! back as a `400` listing every violation.

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use chrono::NaiveDateTime;
use pagination::{PageLinks, PageMetadata};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateEventRequest, UpdateEventRequest};
use crate::domain::{
    ApiResult, Event, EventDetails, EventDraft, EventPageQuery, EventStatus, Violation,
};

use super::auth::{Authenticated, Caller};
use super::hal::{HAL_JSON, Link, LinkBuilder, Links};
use super::schemas::{ErrorSchema, PageMetadataSchema, ViolationSchema};
use super::state::HttpState;
use super::validation::{page_request, parse_event_id};

/// Wire format for event date-times: ISO-8601 local time without an offset.
mod local_date_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";
    const INPUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        INPUTS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(OUTPUT))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw).ok_or_else(|| {
                    D::Error::custom(format!("`{raw}` is not a date-time like 2018-11-23T14:21"))
                })
            })
            .transpose()
    }
}

/// Editable event fields. Missing values are reported by validation, not by
/// deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPayload {
    #[serde(default)]
    #[schema(example = "Spring REST Docs meetup")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "Hands-on session")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "local_date_time::deserialize_option")]
    #[schema(value_type = Option<String>, example = "2018-11-23T14:21")]
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "local_date_time::deserialize_option")]
    #[schema(value_type = Option<String>, example = "2018-11-24T14:21")]
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "local_date_time::deserialize_option")]
    #[schema(value_type = Option<String>, example = "2018-11-25T14:21")]
    pub begin_event_date_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "local_date_time::deserialize_option")]
    #[schema(value_type = Option<String>, example = "2018-11-26T14:21")]
    pub end_event_date_time: Option<NaiveDateTime>,
    /// Leave empty for online events.
    #[serde(default)]
    #[schema(example = "D2 startup factory")]
    pub location: Option<String>,
    #[serde(default)]
    #[schema(example = 100)]
    pub base_price: Option<i32>,
    /// `0` means no upper bound.
    #[serde(default)]
    #[schema(example = 200)]
    pub max_price: Option<i32>,
    #[serde(default)]
    #[schema(example = 100)]
    pub limit_of_enrollment: Option<i32>,
}

impl From<EventPayload> for EventDraft {
    fn from(payload: EventPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            begin_enrollment_date_time: payload.begin_enrollment_date_time,
            close_enrollment_date_time: payload.close_enrollment_date_time,
            begin_event_date_time: payload.begin_event_date_time,
            end_event_date_time: payload.end_event_date_time,
            location: payload.location,
            base_price: payload.base_price,
            max_price: payload.max_price,
            limit_of_enrollment: payload.limit_of_enrollment,
        }
    }
}

/// Reference to the managing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ManagerRef {
    #[schema(example = 1)]
    pub id: i64,
}

/// HAL representation of an event.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    #[schema(example = 1)]
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "local_date_time::serialize")]
    #[schema(value_type = String, example = "2018-11-23T14:21:00")]
    pub begin_enrollment_date_time: NaiveDateTime,
    #[serde(serialize_with = "local_date_time::serialize")]
    #[schema(value_type = String, example = "2018-11-24T14:21:00")]
    pub close_enrollment_date_time: NaiveDateTime,
    #[serde(serialize_with = "local_date_time::serialize")]
    #[schema(value_type = String, example = "2018-11-25T14:21:00")]
    pub begin_event_date_time: NaiveDateTime,
    #[serde(serialize_with = "local_date_time::serialize")]
    #[schema(value_type = String, example = "2018-11-26T14:21:00")]
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    /// Both prices are zero.
    pub free: bool,
    /// A location is set.
    pub offline: bool,
    #[schema(value_type = String, example = "DRAFT")]
    pub event_status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerRef>,
    #[serde(rename = "_links")]
    #[schema(value_type = HashMap<String, Link>)]
    pub links: Links,
}

impl EventResource {
    pub fn new(event: &Event, links: Links) -> Self {
        let details = event.details();
        Self {
            id: event.id().get(),
            name: details.name.clone(),
            description: details.description.clone(),
            begin_enrollment_date_time: details.begin_enrollment_date_time,
            close_enrollment_date_time: details.close_enrollment_date_time,
            begin_event_date_time: details.begin_event_date_time,
            end_event_date_time: details.end_event_date_time,
            location: details.location.clone(),
            base_price: details.base_price,
            max_price: details.max_price,
            limit_of_enrollment: details.limit_of_enrollment,
            free: event.is_free(),
            offline: event.is_offline(),
            event_status: event.status(),
            manager: event.manager().map(|id| ManagerRef { id: id.get() }),
            links,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedEvents {
    pub event_list: Vec<EventResource>,
}

/// One page of events.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventCollection {
    /// Omitted when the page is empty.
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<EmbeddedEvents>,
    #[serde(rename = "_links")]
    #[schema(value_type = HashMap<String, Link>)]
    pub links: Links,
    #[schema(value_type = PageMetadataSchema)]
    pub page: PageMetadata,
}

/// Every violation found in a rejected payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViolationReport {
    #[schema(value_type = Vec<ViolationSchema>)]
    pub content: Vec<Violation>,
    #[serde(rename = "_links")]
    #[schema(value_type = HashMap<String, Link>)]
    pub links: Links,
}

fn link_builder(req: &HttpRequest, state: &HttpState) -> ApiResult<LinkBuilder> {
    LinkBuilder::from_request(req, state.public_base_url.as_ref())
}

fn violation_response(links: &LinkBuilder, violations: Vec<Violation>) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(HAL_JSON)
        .json(ViolationReport {
            content: violations,
            links: Links::new().with("index", links.index()),
        })
}

/// Create a draft event managed by the caller.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventPayload,
    responses(
        (status = 201, description = "Event created", body = EventResource,
            content_type = "application/hal+json",
            headers(("Location" = String, description = "URL of the new event"))),
        (status = 400, description = "Violations or malformed body", body = ViolationReport),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 503, description = "Event store unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent",
    security(("BearerToken" = []))
)]
#[post("/api/events")]
pub async fn create_event(
    req: HttpRequest,
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    payload: web::Json<EventPayload>,
) -> ApiResult<HttpResponse> {
    let links = link_builder(&req, &state)?;
    let details = match EventDetails::try_from_draft(payload.into_inner().into()) {
        Ok(details) => details,
        Err(violations) => return Ok(violation_response(&links, violations)),
    };

    let event = state
        .events
        .create_event(CreateEventRequest {
            details,
            manager: principal.account_id(),
        })
        .await?;

    let self_href = links.event(event.id());
    let resource = EventResource::new(
        &event,
        Links::new()
            .with("self", self_href.clone())
            .with("query-events", links.events())
            .with("update-event", self_href.clone())
            .with("profile", links.profile("createEvent")),
    );
    Ok(HttpResponse::Created()
        .content_type(HAL_JSON)
        .insert_header((LOCATION, self_href))
        .json(resource))
}

/// Page through events.
#[utoipa::path(
    get,
    path = "/api/events",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page index", example = 0),
        ("size" = Option<u32>, Query, description = "Page size, 1 to 2000", example = 20),
        ("sort" = Option<Vec<String>>, Query,
            description = "Repeatable `property[,ASC|DESC]`", example = json!(["name,DESC"]))
    ),
    responses(
        (status = 200, description = "A page of events", body = EventCollection,
            content_type = "application/hal+json"),
        (status = 400, description = "Invalid paging or sort parameter", body = ErrorSchema),
        (status = 401, description = "Invalid bearer token", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security((), ("BearerToken" = []))
)]
#[get("/api/events")]
pub async fn list_events(
    req: HttpRequest,
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let links = link_builder(&req, &state)?;
    let page = page_request(req.query_string())?;
    let result = state
        .events_query
        .list_events(EventPageQuery::from_request(&page)?)
        .await?;

    let metadata = PageMetadata::new(&page, result.total);
    let items: Vec<EventResource> = result
        .events
        .iter()
        .map(|event| EventResource::new(event, Links::new().with("self", links.event(event.id()))))
        .collect();

    let collection = EventCollection {
        embedded: (!items.is_empty()).then_some(EmbeddedEvents { event_list: items }),
        links: Links::new()
            .with_pages(PageLinks::build(&links.url("api/events"), &page, &metadata))
            .with("profile", links.profile("listEvents"))
            .with_if(caller.is_authenticated(), "create-event", links.events()),
        page: metadata,
    };
    Ok(HttpResponse::Ok().content_type(HAL_JSON).json(collection))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "The event", body = EventResource,
            content_type = "application/hal+json"),
        (status = 401, description = "Invalid bearer token", body = ErrorSchema),
        (status = 404, description = "No such event; empty body")
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security((), ("BearerToken" = []))
)]
#[get("/api/events/{id}")]
pub async fn get_event(
    req: HttpRequest,
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_event_id(&path)?;
    let links = link_builder(&req, &state)?;
    let event = state.events_query.get_event(id).await?;

    let self_href = links.event(event.id());
    let resource = EventResource::new(
        &event,
        Links::new()
            .with("self", self_href.clone())
            .with("profile", links.profile("getEvent"))
            .with_if(caller.may_update(&event), "update-event", self_href),
    );
    Ok(HttpResponse::Ok().content_type(HAL_JSON).json(resource))
}

/// Replace every editable field of an event.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event identifier")),
    request_body = EventPayload,
    responses(
        (status = 200, description = "Event updated", body = EventResource,
            content_type = "application/hal+json"),
        (status = 400, description = "Violations or malformed body", body = ViolationReport),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Caller does not manage the event", body = ErrorSchema),
        (status = 404, description = "No such event; empty body")
    ),
    tags = ["events"],
    operation_id = "updateEvent",
    security(("BearerToken" = []))
)]
#[put("/api/events/{id}")]
pub async fn update_event(
    req: HttpRequest,
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<String>,
    payload: web::Json<EventPayload>,
) -> ApiResult<HttpResponse> {
    let id = parse_event_id(&path)?;
    let links = link_builder(&req, &state)?;
    let details = match EventDetails::try_from_draft(payload.into_inner().into()) {
        Ok(details) => details,
        Err(violations) => return Ok(violation_response(&links, violations)),
    };

    let event = state
        .events
        .update_event(UpdateEventRequest {
            id,
            details,
            caller: principal.account_id(),
        })
        .await?;

    let self_href = links.event(event.id());
    let resource = EventResource::new(
        &event,
        Links::new()
            .with("self", self_href.clone())
            .with("profile", links.profile("updateEvent"))
            .with("update-event", self_href),
    );
    Ok(HttpResponse::Ok().content_type(HAL_JSON).json(resource))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
