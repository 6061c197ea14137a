//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod events;
pub mod hal;
pub mod health;
pub mod index;
pub mod oauth;
pub mod schemas;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::TRACE_ID_HEADER;

/// Register the OAuth2, index and event endpoints.
///
/// Health checks, documentation and middleware are wired by the server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(oauth::issue_token)
        .service(index::index)
        .service(events::create_event)
        .service(events::list_events)
        .service(events::get_event)
        .service(events::update_event);
}
