//! Sequential account number allocation.

use std::sync::atomic::{AtomicI64, Ordering};

use super::StoreError;

/// First number handed out on an empty system.
pub const FIRST_ACCOUNT_NUMBER: i64 = 11_111_111;

/// In-process source of account numbers.
///
/// Numbers are unique and strictly increasing for the lifetime of the
/// sequence and never go back down. The only shared state is one atomic, so
/// allocation never waits on hashing or storage.
#[derive(Debug)]
pub struct AccountNumberSequence {
    next: AtomicI64,
}

impl Default for AccountNumberSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountNumberSequence {
    /// Creates a sequence starting at [`FIRST_ACCOUNT_NUMBER`].
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(FIRST_ACCOUNT_NUMBER)
    }

    /// Creates a sequence whose first allocation is `first`.
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Allocates the next account number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NumbersExhausted` once `i64::MAX` has been issued.
    pub fn allocate(&self) -> Result<i64, StoreError> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| StoreError::NumbersExhausted)
    }

    /// Returns the number the next allocation would receive.
    #[must_use]
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }
}
