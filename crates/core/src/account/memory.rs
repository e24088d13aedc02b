//! In-memory account store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Account, AccountNumberSequence, AccountStore, NewAccount, StoreError};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, Account>,
}

/// [`AccountStore`] kept in process memory.
///
/// Mirrors the table's constraints: serial ids, unique account numbers and a
/// number sequence that deletes never wind back.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Inner>,
    numbers: AccountNumberSequence,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose first account number is `first`.
    #[must_use]
    pub fn with_first_number(first: i64) -> Self {
        Self {
            inner: RwLock::default(),
            numbers: AccountNumberSequence::starting_at(first),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.rows.values().any(|a| a.number == account.number) {
            return Err(StoreError::DuplicateNumber(account.number));
        }

        inner.last_id += 1;
        let account = account.into_account(inner.last_id);
        inner.rows.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get(&self, id: i32) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .find(|a| a.number == number)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn next_number(&self) -> Result<i64, StoreError> {
        self.numbers.allocate()
    }
}
