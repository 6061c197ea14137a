use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::lock;
use crate::domain::ports::{StoredToken, TokenKind, TokenStore, TokenStoreError};

/// Token digest store holding rows in memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<(String, TokenKind), StoredToken>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError> {
        let mut tokens = lock(&self.tokens, TokenStoreError::query)?;
        tokens.insert((token.digest.clone(), token.kind), token.clone());
        Ok(())
    }

    async fn find(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError> {
        let tokens = lock(&self.tokens, TokenStoreError::query)?;
        Ok(tokens.get(&(digest.to_owned(), kind)).cloned())
    }

    async fn take(
        &self,
        digest: &str,
        kind: TokenKind,
    ) -> Result<Option<StoredToken>, TokenStoreError> {
        let mut tokens = lock(&self.tokens, TokenStoreError::query)?;
        Ok(tokens.remove(&(digest.to_owned(), kind)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenStoreError> {
        let mut tokens = lock(&self.tokens, TokenStoreError::query)?;
        let before = tokens.len();
        tokens.retain(|_, token| token.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountId;
    use chrono::TimeDelta;
    use rstest::rstest;

    fn token(digest: &str, kind: TokenKind, expires_at: DateTime<Utc>) -> StoredToken {
        StoredToken {
            digest: digest.to_owned(),
            kind,
            account_id: AccountId::new(1),
            expires_at,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn take_consumes_the_token_once() {
        let store = InMemoryTokenStore::new();
        let now = Utc::now();
        store
            .save(&token("abc", TokenKind::Refresh, now))
            .await
            .expect("save");

        assert!(store.take("abc", TokenKind::Refresh).await.expect("take").is_some());
        assert!(store.take("abc", TokenKind::Refresh).await.expect("take").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn kinds_do_not_collide() {
        let store = InMemoryTokenStore::new();
        store
            .save(&token("abc", TokenKind::Access, Utc::now()))
            .await
            .expect("save");

        assert!(store.find("abc", TokenKind::Refresh).await.expect("find").is_none());
        assert!(store.find("abc", TokenKind::Access).await.expect("find").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn purge_drops_only_expired_tokens() {
        let store = InMemoryTokenStore::new();
        let now = Utc::now();
        store
            .save(&token("old", TokenKind::Access, now - TimeDelta::seconds(1)))
            .await
            .expect("save");
        store
            .save(&token("new", TokenKind::Access, now + TimeDelta::seconds(60)))
            .await
            .expect("save");

        assert_eq!(store.purge_expired(now).await.expect("purge"), 1);
        assert!(store.find("new", TokenKind::Access).await.expect("find").is_some());
    }
}
