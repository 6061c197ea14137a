//! OAuth2 token issuance and bearer token resolution.
//!
//! Tokens are 256-bit random values rendered as unpadded URL-safe base64.
//! Only their SHA-256 digests reach the [`TokenStore`]. Refresh tokens are
//! single use: redeeming one removes it and mints a fresh pair.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::TimeDelta;
use mockable::Clock;
use rand::RngCore as _;
use sha2::{Digest as _, Sha256};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccessTokenResolver, AccountDirectory, StoredToken, TokenIssuer, TokenKind, TokenStore,
    TokenStoreError,
};
use crate::domain::{
    AccountId, ClientCredentials, Error, IssuedTokens, OAuthError, Principal, TOKEN_SCOPE,
    TokenGrant, TokenRequest,
};

const TOKEN_BYTES: usize = 32;

/// Lower-case hex SHA-256 digest of a token value.
///
/// # Examples
/// ```
/// use events_api::domain::token_digest;
///
/// assert_eq!(token_digest("abc").len(), 64);
/// ```
#[must_use]
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn map_store_error(error: TokenStoreError) -> Error {
    match error {
        TokenStoreError::Connection { message } => {
            Error::service_unavailable(format!("token store unavailable: {message}"))
        }
        TokenStoreError::Query { message } => {
            Error::internal(format!("token store error: {message}"))
        }
    }
}

/// Registered client and token lifetimes.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub client: ClientCredentials,
    pub access_ttl: TimeDelta,
    pub refresh_ttl: TimeDelta,
}

/// Token service implementing [`TokenIssuer`] and [`AccessTokenResolver`].
#[derive(Clone)]
pub struct TokenService<A, S> {
    accounts: Arc<A>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    settings: TokenSettings,
}

impl<A, S> TokenService<A, S> {
    pub fn new(
        accounts: Arc<A>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            accounts,
            store,
            clock,
            settings,
        }
    }
}

impl<A, S> TokenService<A, S>
where
    A: AccountDirectory,
    S: TokenStore,
{
    async fn mint(&self, account_id: AccountId) -> Result<IssuedTokens, Error> {
        let now = self.clock.utc();
        let access_token = generate_token();
        let refresh_token = generate_token();

        for (value, kind, ttl) in [
            (&access_token, TokenKind::Access, self.settings.access_ttl),
            (&refresh_token, TokenKind::Refresh, self.settings.refresh_ttl),
        ] {
            self.store
                .save(&StoredToken {
                    digest: token_digest(value),
                    kind,
                    account_id,
                    expires_at: now + ttl,
                })
                .await
                .map_err(map_store_error)?;
        }

        info!(account_id = %account_id, "tokens issued");
        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.settings.access_ttl.num_seconds(),
            scope: TOKEN_SCOPE,
        })
    }

    async fn password_grant(
        &self,
        credentials: &crate::domain::LoginCredentials,
    ) -> Result<AccountId, OAuthError> {
        let account = self
            .accounts
            .authenticate(credentials)
            .await?
            .ok_or_else(|| OAuthError::InvalidGrant("Bad credentials".to_owned()))?;

        let now = self.clock.utc();
        if let Err(err) = self.store.purge_expired(now).await {
            warn!(error = %err, "failed to purge expired tokens");
        }
        Ok(account.id())
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<AccountId, OAuthError> {
        let invalid = || OAuthError::InvalidGrant("Invalid refresh token".to_owned());
        let stored = self
            .store
            .take(&token_digest(refresh_token), TokenKind::Refresh)
            .await
            .map_err(map_store_error)?
            .ok_or_else(invalid)?;

        if stored.expires_at <= self.clock.utc() {
            debug!(account_id = %stored.account_id, "expired refresh token presented");
            return Err(OAuthError::InvalidGrant(
                "Invalid refresh token (expired)".to_owned(),
            ));
        }

        let account = self
            .accounts
            .find_by_id(stored.account_id)
            .await?
            .ok_or_else(invalid)?;
        Ok(account.id())
    }
}

#[async_trait]
impl<A, S> TokenIssuer for TokenService<A, S>
where
    A: AccountDirectory,
    S: TokenStore,
{
    async fn issue(&self, request: TokenRequest) -> Result<IssuedTokens, OAuthError> {
        let TokenRequest { client, grant } = request;
        if !client.matches(&self.settings.client) {
            warn!(client_id = client.client_id(), "client authentication failed");
            return Err(OAuthError::InvalidClient);
        }

        let account_id = match &grant {
            TokenGrant::Password(credentials) => self.password_grant(credentials).await?,
            TokenGrant::RefreshToken(token) => self.refresh_grant(token.as_str()).await?,
        };
        self.mint(account_id).await.map_err(OAuthError::from)
    }
}

#[async_trait]
impl<A, S> AccessTokenResolver for TokenService<A, S>
where
    A: AccountDirectory,
    S: TokenStore,
{
    async fn resolve(&self, access_token: &str) -> Result<Principal, Error> {
        let stored = self
            .store
            .find(&token_digest(access_token), TokenKind::Access)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized("invalid access token"))?;

        if stored.expires_at <= self.clock.utc() {
            return Err(Error::unauthorized("access token expired"));
        }

        let account = self
            .accounts
            .find_by_id(stored.account_id)
            .await?
            .ok_or_else(|| Error::unauthorized("access token owner no longer exists"))?;

        Ok(Principal::new(
            account.id(),
            account.email().clone(),
            account.roles().iter().copied(),
        ))
    }
}

#[cfg(test)]
#[path = "token_service_tests.rs"]
mod tests;
