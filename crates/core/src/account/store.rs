//! Storage collaborator for accounts.

use async_trait::async_trait;

use super::{Account, NewAccount, StoreError};

/// Persistence operations the account handlers rely on.
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persists a new account and returns it with its assigned id.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Fetches an account by row id.
    async fn get(&self, id: i32) -> Result<Option<Account>, StoreError>;

    /// Fetches an account by account number.
    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts ordered by id.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Deletes an account. Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Draws the next account number.
    ///
    /// Numbers are strictly increasing and never handed out twice, including
    /// numbers whose account has since been deleted.
    async fn next_number(&self) -> Result<i64, StoreError>;
}
