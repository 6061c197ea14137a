use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, Email, NewAccount};

#[derive(Debug, Default)]
struct AccountTable {
    last_id: i64,
    rows: BTreeMap<AccountId, Account>,
}

/// Account repository holding rows in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    table: Mutex<AccountTable>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut table = lock(&self.table, AccountRepositoryError::query)?;
        if table
            .rows
            .values()
            .any(|existing| existing.email() == account.email())
        {
            return Err(AccountRepositoryError::duplicate_email(
                account.email().as_ref(),
            ));
        }
        table.last_id += 1;
        let stored = Account::from_new(AccountId::new(table.last_id), account.clone());
        table.rows.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError> {
        let table = lock(&self.table, AccountRepositoryError::query)?;
        Ok(table
            .rows
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let table = lock(&self.table, AccountRepositoryError::query)?;
        Ok(table.rows.get(&id).cloned())
    }
}
