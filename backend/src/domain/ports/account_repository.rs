//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Email, NewAccount};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses this e-mail address.
        DuplicateEmail { email: String } => "an account for {email} already exists",
    }
}

/// Storage for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Look an account up by its (normalised) e-mail address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError>;

    /// Look an account up by identifier.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError>;
}
