//! Driving ports for the OAuth token endpoint and bearer authentication.

use async_trait::async_trait;

use crate::domain::{Error, IssuedTokens, OAuthError, Principal, TokenRequest};

/// Exchanges grants for tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, request: TokenRequest) -> Result<IssuedTokens, OAuthError>;
}

/// Resolves bearer tokens to the calling account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenResolver: Send + Sync {
    /// Fails with `unauthorized` for unknown or expired tokens.
    async fn resolve(&self, access_token: &str) -> Result<Principal, Error>;
}
