//! HAL primitives: link maps and absolute link construction.
//!
//! Links are absolute. The origin comes from the configured public base URL
//! when present, otherwise from the request's scheme and `Host`.

use actix_web::HttpRequest;
use pagination::PageLinks;
use serde::ser::{Serialize, SerializeMap, Serializer};
use url::Url;

use crate::domain::{Error, EventId};

/// Media type of every hypermedia response.
pub const HAL_JSON: &str = "application/hal+json;charset=UTF-8";

/// A single `{ "href": ... }` link object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct Link {
    #[schema(example = "http://localhost:8080/api/events/1")]
    pub href: String,
}

/// Ordered `rel -> link` map rendered as the `_links` member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(&'static str, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relation. A repeated `rel` replaces the earlier link.
    #[must_use]
    pub fn with(mut self, rel: &'static str, href: impl Into<String>) -> Self {
        let link = Link { href: href.into() };
        match self.0.iter_mut().find(|(existing, _)| *existing == rel) {
            Some(slot) => slot.1 = link,
            None => self.0.push((rel, link)),
        }
        self
    }

    /// Append `rel` only when `condition` holds.
    #[must_use]
    pub fn with_if(self, condition: bool, rel: &'static str, href: impl Into<String>) -> Self {
        if condition { self.with(rel, href) } else { self }
    }

    /// Append pagination links in navigation order.
    #[must_use]
    pub fn with_pages(self, pages: PageLinks) -> Self {
        pages
            .into_iter()
            .fold(self, |links, page| links.with(page.rel, page.href.to_string()))
    }

    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == rel)
            .map(|(_, link)| link.href.as_str())
    }

    pub fn rels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(rel, _)| *rel)
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// Builds absolute links against the API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    /// Links relative to `base`. A missing trailing slash is added so the
    /// base path is kept when joining.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Self { base }
    }

    /// Resolve the origin for `req`.
    ///
    /// # Errors
    /// Returns `400` when the client-supplied host cannot form a URL.
    pub fn from_request(req: &HttpRequest, configured: Option<&Url>) -> Result<Self, Error> {
        if let Some(base) = configured {
            return Ok(Self::new(base.clone()));
        }
        let info = req.connection_info();
        let origin = format!("{}://{}/", info.scheme(), info.host());
        Url::parse(&origin).map(Self::new).map_err(|err| {
            Error::invalid_request(format!("invalid Host header `{}`: {err}", info.host()))
        })
    }

    /// Absolute URL for a path relative to the API origin.
    pub fn url(&self, path: &str) -> Url {
        let relative = path.trim_start_matches('/');
        self.base
            .join(relative)
            .unwrap_or_else(|_| self.base.clone())
    }

    pub fn href(&self, path: &str) -> String {
        self.url(path).to_string()
    }

    pub fn index(&self) -> String {
        self.href("api")
    }

    pub fn events(&self) -> String {
        self.href("api/events")
    }

    pub fn event(&self, id: EventId) -> String {
        self.href(&format!("api/events/{id}"))
    }

    /// Deep link into the Swagger UI entry for `operation_id`.
    pub fn profile(&self, operation_id: &str) -> String {
        self.href(&format!("docs/index.html#/events/{operation_id}"))
    }
}
