//! Driving port for account registration and credential checks.

use std::collections::BTreeSet;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Account, AccountId, AccountRole, Email, Error, LoginCredentials};

/// Plain-text registration request. The password is hashed before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAccountRequest {
    pub email: Email,
    pub password: Zeroizing<String>,
    pub roles: BTreeSet<AccountRole>,
}

impl RegisterAccountRequest {
    pub fn new(
        email: Email,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Self {
        Self {
            email,
            password: Zeroizing::new(password.into()),
            roles: roles.into_iter().collect(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Hash the password and store a new account.
    ///
    /// Fails with `invalid_request` when the e-mail is already registered.
    async fn save_account(&self, request: RegisterAccountRequest) -> Result<Account, Error>;

    /// Register the account unless the e-mail is already taken, in which case
    /// the existing account is returned untouched.
    async fn ensure_account(&self, request: RegisterAccountRequest) -> Result<Account, Error>;

    /// Load an account by username; `not_found` when absent.
    async fn load_by_username(&self, username: &str) -> Result<Account, Error>;

    /// Load an account by identifier.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error>;

    /// Verify credentials. `None` covers both unknown users and wrong
    /// passwords.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<Option<Account>, Error>;
}
