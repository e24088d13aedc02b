//! Account error types.

use thiserror::Error;

use crate::auth::PasswordError;

/// Errors raised while opening an account.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Password could not be hashed.
    #[error(transparent)]
    Hashing(#[from] PasswordError),

    /// The hashing task was cancelled or panicked.
    #[error("password hashing task failed: {0}")]
    HashingTask(String),

    /// Drawing a number or persisting the account failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by an [`AccountStore`](super::AccountStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// An account with this number already exists.
    #[error("account number {0} already exists")]
    DuplicateNumber(i64),

    /// The account number space is used up.
    #[error("account numbers exhausted")]
    NumbersExhausted,

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Database(String),
}
