//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod auth;
pub mod health;
pub mod transfer;

/// Creates the API router with all routes.
///
/// Takes the state because the per-account routes install the ownership
/// gate as a route layer.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(accounts::routes(state))
        .merge(transfer::routes())
}
