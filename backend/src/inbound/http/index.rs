//! API entry point advertising the top-level collections.

use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ApiResult;

use super::hal::{HAL_JSON, Link, LinkBuilder, Links};
use super::state::HttpState;

/// `GET /api` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndexResource {
    #[serde(rename = "_links")]
    #[schema(value_type = HashMap<String, Link>)]
    pub links: Links,
}

#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "Links to the API collections", body = IndexResource,
            content_type = "application/hal+json")
    ),
    tags = ["index"],
    operation_id = "index",
    security([])
)]
#[get("/api")]
pub async fn index(req: HttpRequest, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let links = LinkBuilder::from_request(&req, state.public_base_url.as_ref())?;
    Ok(HttpResponse::Ok().content_type(HAL_JSON).json(IndexResource {
        links: Links::new().with("events", links.events()),
    }))
}
