//! Account registration and credential verification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountDirectory, AccountRepository, AccountRepositoryError, PasswordHasher,
    PasswordHasherError, RegisterAccountRequest,
};
use crate::domain::{Account, AccountId, Email, Error, LoginCredentials, NewAccount};

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { email } => {
            Error::invalid_request(format!("an account for {email} already exists"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Account service backed by a repository and a password hasher.
#[derive(Clone)]
pub struct AccountService<R, H> {
    account_repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H> {
    pub fn new(account_repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            account_repo,
            hasher,
        }
    }
}

impl<R, H> AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    async fn insert(&self, request: RegisterAccountRequest) -> Result<Account, AccountServiceFailure> {
        let RegisterAccountRequest {
            email,
            password,
            roles,
        } = request;
        let hash = self
            .hasher
            .hash(password.as_str())
            .map_err(|err| AccountServiceFailure::Other(map_hasher_error(err)))?;
        self.account_repo
            .insert(&NewAccount::new(email, hash, roles))
            .await
            .map_err(AccountServiceFailure::from)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, Error> {
        self.account_repo
            .find_by_email(email)
            .await
            .map_err(map_repository_error)
    }
}

/// Keeps duplicate-email failures distinguishable until the caller decides
/// how to report them.
enum AccountServiceFailure {
    Duplicate(AccountRepositoryError),
    Other(Error),
}

impl From<AccountRepositoryError> for AccountServiceFailure {
    fn from(value: AccountRepositoryError) -> Self {
        match value {
            AccountRepositoryError::DuplicateEmail { .. } => Self::Duplicate(value),
            other => Self::Other(map_repository_error(other)),
        }
    }
}

impl From<AccountServiceFailure> for Error {
    fn from(value: AccountServiceFailure) -> Self {
        match value {
            AccountServiceFailure::Duplicate(err) => map_repository_error(err),
            AccountServiceFailure::Other(err) => err,
        }
    }
}

#[async_trait]
impl<R, H> AccountDirectory for AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    async fn save_account(&self, request: RegisterAccountRequest) -> Result<Account, Error> {
        let account = self.insert(request).await?;
        info!(account_id = %account.id(), email = %account.email(), "account registered");
        Ok(account)
    }

    async fn ensure_account(&self, request: RegisterAccountRequest) -> Result<Account, Error> {
        if let Some(existing) = self.find_by_email(&request.email).await? {
            return Ok(existing);
        }

        let email = request.email.clone();
        match self.insert(request).await {
            Ok(account) => {
                info!(account_id = %account.id(), email = %account.email(), "account seeded");
                Ok(account)
            }
            Err(AccountServiceFailure::Duplicate(_)) => self
                .find_by_email(&email)
                .await?
                .ok_or_else(|| Error::internal(format!("account {email} vanished after insert"))),
            Err(AccountServiceFailure::Other(err)) => Err(err),
        }
    }

    async fn load_by_username(&self, username: &str) -> Result<Account, Error> {
        let not_found = || Error::not_found(format!("no account for username {username}"));
        let email = Email::new(username).map_err(|_| not_found())?;
        self.find_by_email(&email).await?.ok_or_else(not_found)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.account_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Account>, Error> {
        let Ok(email) = Email::new(credentials.username()) else {
            return Ok(None);
        };
        let Some(account) = self.find_by_email(&email).await? else {
            return Ok(None);
        };

        let matches = self
            .hasher
            .verify(credentials.password(), account.password_hash())
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(account_id = %account.id(), "password mismatch");
            return Ok(None);
        }
        Ok(Some(account))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
