//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenStore`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports ([`EventCommand`],
//! [`EventQuery`], [`AccountDirectory`], [`TokenIssuer`],
//! [`AccessTokenResolver`]) are implemented by domain services and consumed
//! by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod account_directory;
mod account_repository;
mod event_command;
mod event_query;
mod event_repository;
mod password_hasher;
mod token_issuer;
mod token_store;

#[cfg(test)]
pub use account_directory::MockAccountDirectory;
pub use account_directory::{AccountDirectory, RegisterAccountRequest};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_command::{CreateEventRequest, EventCommand, UpdateEventRequest};
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_query::EventQuery;
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_issuer::{MockAccessTokenResolver, MockTokenIssuer};
pub use token_issuer::{AccessTokenResolver, TokenIssuer};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{StoredToken, TokenKind, TokenStore, TokenStoreError};
