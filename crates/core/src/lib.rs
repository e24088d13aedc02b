//! Core account logic for Bankline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `account` - Account model, numbering, and the storage trait
//! - `auth` - Password hashing

pub mod account;
pub mod auth;
