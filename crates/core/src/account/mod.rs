//! Accounts: the model, number allocation, and the storage seam.
//!
//! This module provides:
//! - `open_account` - hashing, numbering and persisting a new account
//! - `AccountNumberSequence` - lock-free unique number source
//! - `AccountStore` - the persistence trait implemented by the db crate,
//!   which also owns the account-number counter
//! - `InMemoryAccountStore` - a store for tests and local runs

mod error;
mod memory;
mod model;
mod numbering;
mod store;

pub use error::{AccountError, StoreError};
pub use memory::InMemoryAccountStore;
pub use model::{Account, NewAccount, open_account};
pub use numbering::{AccountNumberSequence, FIRST_ACCOUNT_NUMBER};
pub use store::AccountStore;
