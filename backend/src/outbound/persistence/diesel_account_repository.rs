//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Emails are stored in their normalised lower-case form, so equality lookups
//! are case-insensitive without a functional index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, AccountRole, Email, NewAccount, PasswordHash};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let AccountRow {
        id,
        email,
        password_hash,
        roles,
    } = row;

    let email = Email::new(email).map_err(|err| AccountRepositoryError::query(err.to_string()))?;
    let roles = roles
        .iter()
        .map(|role| role.parse::<AccountRole>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| AccountRepositoryError::query(err.to_string()))?;

    Ok(Account::new(
        AccountId::new(id),
        email,
        PasswordHash::new(password_hash),
        roles,
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            email: account.email().as_ref(),
            password_hash: account.password_hash().as_str(),
            roles: account
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        };

        let row = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result::<AccountRow>(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_email(account.email().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_account(row)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .find(id.get())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }
}
