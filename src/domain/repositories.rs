//! Repository Pattern Abstractions
//!
//! Tracked accounts are owned by a persistence collaborator. The tracker only
//! sees this trait; `InMemoryAccountRepository` is the bundled implementation.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::account::TrackedAccount;

/// Repository for persisting and retrieving tracked accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert or replace an account
    async fn save(&self, account: &TrackedAccount) -> Result<()>;

    /// Insert a new account unless `cap` accounts are already stored
    ///
    /// The check and the insert happen atomically. Returns the new count, or
    /// `None` when the cap was reached and nothing was stored.
    async fn insert_capped(
        &self,
        account: &TrackedAccount,
        cap: Option<usize>,
    ) -> Result<Option<usize>>;

    /// Find an account by id
    async fn find(&self, id: Uuid) -> Result<Option<TrackedAccount>>;

    /// Get all accounts
    async fn get_all(&self) -> Result<Vec<TrackedAccount>>;

    /// Count tracked accounts
    async fn count(&self) -> Result<usize>;
}
