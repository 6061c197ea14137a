//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to domain
//! ports, so they can be exercised with in-memory adapters or mocks.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{AccessTokenResolver, EventCommand, EventQuery, TokenIssuer};

/// Port implementations consumed by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub events: Arc<dyn EventCommand>,
    pub events_query: Arc<dyn EventQuery>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub principals: Arc<dyn AccessTokenResolver>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events: Arc<dyn EventCommand>,
    pub events_query: Arc<dyn EventQuery>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub principals: Arc<dyn AccessTokenResolver>,
    /// Origin used for hypermedia links instead of the request's `Host`.
    pub public_base_url: Option<Url>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            events,
            events_query,
            tokens,
            principals,
        } = ports;
        Self {
            events,
            events_query,
            tokens,
            principals,
            public_base_url: None,
        }
    }

    #[must_use]
    pub fn with_public_base_url(mut self, base: Option<Url>) -> Self {
        self.public_base_url = base;
        self
    }
}
