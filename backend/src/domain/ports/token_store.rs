//! Port for issued OAuth token bookkeeping.
//!
//! Stores only ever see SHA-256 digests of token values. The raw token is
//! returned to the client once and never persisted.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::AccountId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "token store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token store query failed: {message}",
    }
}

/// Purpose of a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = TokenStoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "access" => Ok(Self::Access),
            "refresh" => Ok(Self::Refresh),
            other => Err(TokenStoreError::query(format!("unknown token kind `{other}`"))),
        }
    }
}

/// Digest of an issued token plus its owner and expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    /// Lower-case hex SHA-256 of the token value.
    pub digest: String,
    pub kind: TokenKind,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
}

/// Storage for token digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Record a freshly issued token.
    async fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError>;

    /// Look a token up without consuming it.
    async fn find(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError>;

    /// Remove a token and return it if it existed. A token can be taken at
    /// most once.
    async fn take(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError>;

    /// Drop every token that expired before `now`. Returns how many were
    /// removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenStoreError>;
}
