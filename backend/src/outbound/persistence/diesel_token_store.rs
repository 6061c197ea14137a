//! PostgreSQL-backed `TokenStore` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::AccountId;
use crate::domain::ports::{StoredToken, TokenKind, TokenStore, TokenStoreError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewOAuthTokenRow, OAuthTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::oauth_tokens;

/// Diesel-backed implementation of the token store port.
#[derive(Clone)]
pub struct DieselTokenStore {
    pool: DbPool,
}

impl DieselTokenStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenStoreError {
    map_basic_pool_error(error, TokenStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenStoreError {
    map_basic_diesel_error(error, TokenStoreError::query, TokenStoreError::connection)
}

fn row_to_token(row: OAuthTokenRow) -> Result<StoredToken, TokenStoreError> {
    Ok(StoredToken {
        kind: row.kind.parse()?,
        digest: row.digest,
        account_id: AccountId::new(row.account_id),
        expires_at: row.expires_at,
    })
}

#[async_trait]
impl TokenStore for DieselTokenStore {
    async fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewOAuthTokenRow {
            digest: token.digest.as_str(),
            kind: token.kind.as_str(),
            account_id: token.account_id.get(),
            expires_at: token.expires_at,
        };

        diesel::insert_into(oauth_tokens::table)
            .values(&new_row)
            .on_conflict((oauth_tokens::digest, oauth_tokens::kind))
            .do_update()
            .set((
                oauth_tokens::account_id.eq(new_row.account_id),
                oauth_tokens::expires_at.eq(new_row.expires_at),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = oauth_tokens::table
            .find((digest, kind.as_str()))
            .select(OAuthTokenRow::as_select())
            .first::<OAuthTokenRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_token).transpose()
    }

    async fn take(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // DELETE ... RETURNING: at most one caller observes the row.
        let row = diesel::delete(oauth_tokens::table.find((digest, kind.as_str())))
            .returning(OAuthTokenRow::as_returning())
            .get_result::<OAuthTokenRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_token).transpose()
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(oauth_tokens::table.filter(oauth_tokens::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(removed).unwrap_or_default())
    }
}
