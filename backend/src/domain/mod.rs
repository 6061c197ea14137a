//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for events and accounts, the pure
//! validation and derived-field rules, and the services that implement the
//! driving ports consumed by the HTTP adapter.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Event`, `EventDetails`, `EventDraft`, `validate_event`: event aggregate.
//! - `Account`, `Email`, `AccountRole`: account identity.
//! - `LoginCredentials`, `TokenRequest`, `OAuthError`, `Principal`: OAuth2.
//! - `ports`: trait seams implemented by adapters and services.

pub mod account;
mod account_service;
pub mod auth;
pub mod error;
pub mod event;
mod event_service;
pub mod ports;
mod token_service;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, AccountRole, AccountValidationError, Email, NewAccount, PasswordHash,
};
pub use self::account_service::AccountService;
pub use self::auth::{
    ClientCredentials, CredentialsValidationError, IssuedTokens, LoginCredentials, OAuthError,
    Principal, TOKEN_SCOPE, TOKEN_TYPE, TokenGrant, TokenRequest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{
    EVENT_OBJECT_NAME, Event, EventDetails, EventDraft, EventId, EventPage, EventPageQuery,
    EventSort, EventSortField, EventStatus, NewEvent, UnknownEventStatus, Violation,
    validate_event,
};
pub use self::event_service::{EventCommandService, EventQueryService};
pub use self::token_service::{TokenService, TokenSettings, token_digest};
pub use self::trace_id::TraceId;

/// Convenient result alias for fallible domain and handler code.
///
/// # Examples
/// ```
/// use events_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
