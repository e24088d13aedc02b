//! Password hashing for account credentials.

mod password;

pub use password::{PasswordError, PasswordService};
