//! Bearer-token authentication for resource endpoints.
//!
//! [`Caller`] resolves an optional principal: anonymous requests pass, but a
//! token that is present and invalid is rejected with `401`. [`Authenticated`]
//! additionally requires a principal.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Event, Principal};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the bearer token from `Authorization`.
///
/// Other schemes are ignored. A bearer header without a token is an error.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    let (scheme, token) = value.trim().split_once(' ').unwrap_or((value.trim(), ""));
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Ok(None);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("bearer token is empty"));
    }
    Ok(Some(token.to_owned()))
}

/// The caller of a request, if it presented a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(Option<Principal>);

impl Caller {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// Whether the caller is signed in and may modify `event`.
    pub fn may_update(&self, event: &Event) -> bool {
        self.0
            .as_ref()
            .is_some_and(|principal| event.is_managed_by(principal.account_id()))
    }

    /// # Errors
    /// Returns `401` for anonymous callers.
    pub fn require(self) -> Result<Principal, Error> {
        self.0
            .ok_or_else(|| Error::unauthorized("full authentication is required"))
    }
}

impl From<Principal> for Caller {
    fn from(principal: Principal) -> Self {
        Self(Some(principal))
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token? else {
                return Ok(Self::anonymous());
            };
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let principal = state.principals.resolve(&token).await?;
            Ok(Self::from(principal))
        })
    }
}

/// A caller that must be authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let caller = Caller::from_request(req, payload);
        Box::pin(async move { caller.await?.require().map(Self) })
    }
}
