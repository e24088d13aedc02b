//! Request middleware.

pub mod auth;

pub use auth::{AuthorizedAccount, require_account_owner};
