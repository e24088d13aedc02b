//! Shared configuration, errors, and session tokens for Bankline.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Session claims and JWT handling

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

#[cfg(test)]
mod jwt_tests;

pub use auth::{LoginRequest, LoginResponse, SessionClaims};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
