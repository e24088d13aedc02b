//! Account entities and account opening.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{AccountError, AccountStore};
use crate::auth::PasswordService;

/// A persisted bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Storage-assigned row id.
    pub id: i32,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Externally visible account number, fixed once assigned.
    pub number: i64,
    /// Argon2id PHC string.
    pub encrypted_password: String,
    /// Current balance.
    pub balance: f64,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// An account that has been numbered but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Allocated account number.
    pub number: i64,
    /// Argon2id PHC string.
    pub encrypted_password: String,
    /// Opening balance, always zero.
    pub balance: f64,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Builds an unsaved account with a zero balance, stamped now.
    ///
    /// Performs no I/O.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, number: i64, encrypted_password: String) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number,
            encrypted_password,
            balance: 0.0,
            created_at: Utc::now(),
        }
    }

    /// Attaches the storage id, producing the persisted form.
    #[must_use]
    pub fn into_account(self, id: i32) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            encrypted_password: self.encrypted_password,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Opens an account: hashes the password, draws the next number from the
/// store, then persists.
///
/// Hashing runs on the blocking pool and before the number is drawn, so a
/// failed hash never consumes a number.
///
/// # Errors
///
/// Returns `AccountError::Hashing` if the password cannot be hashed and
/// `AccountError::Store` if numbering or persisting fails.
pub async fn open_account(
    store: &dyn AccountStore,
    passwords: Arc<PasswordService>,
    first_name: &str,
    last_name: &str,
    password: String,
) -> Result<Account, AccountError> {
    let encrypted_password = tokio::task::spawn_blocking(move || passwords.hash(&password))
        .await
        .map_err(|e| AccountError::HashingTask(e.to_string()))??;

    let number = store.next_number().await?;
    let account = store
        .create(NewAccount::new(first_name, last_name, number, encrypted_password))
        .await?;

    Ok(account)
}
