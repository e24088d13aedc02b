//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - The account ownership gate
//! - Request extractors
//! - The JSON error envelope

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use bankline_core::{account::AccountStore, auth::PasswordService};
use bankline_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account storage, including the account-number counter.
    pub accounts: Arc<dyn AccountStore>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Password hasher.
    pub password_service: Arc<PasswordService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
