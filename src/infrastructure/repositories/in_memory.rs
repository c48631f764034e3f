//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementation of `AccountRepository`.
//! Data is lost on restart; the dashboard's real store lives elsewhere.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::account::TrackedAccount;
use crate::domain::repositories::AccountRepository;

/// In-memory implementation of AccountRepository
/// Suitable for testing and single-instance deployments
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, TrackedAccount>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: &TrackedAccount) -> Result<()> {
        self.accounts
            .write()
            .await
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn insert_capped(
        &self,
        account: &TrackedAccount,
        cap: Option<usize>,
    ) -> Result<Option<usize>> {
        let mut accounts = self.accounts.write().await;
        if let Some(cap) = cap
            && accounts.len() >= cap
            && !accounts.contains_key(&account.id)
        {
            return Ok(None);
        }
        accounts.insert(account.id, account.clone());
        Ok(Some(accounts.len()))
    }

    async fn find(&self, id: Uuid) -> Result<Option<TrackedAccount>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<TrackedAccount>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<TrackedAccount> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(all)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.accounts.read().await.len())
    }
}
