//! Login route.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use bankline_shared::{LoginRequest, LoginResponse};
use tracing::{error, info};

use crate::{AppState, error::ApiError, extractors::ApiJson};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// POST /login - Check an account's password and issue a fresh token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(account) = state.accounts.get_by_number(payload.number).await? else {
        info!(number = payload.number, "Login attempt for non-existent account");
        return Err(invalid_credentials());
    };

    let passwords = Arc::clone(&state.password_service);
    let hash = account.encrypted_password.clone();
    let verified = tokio::task::spawn_blocking(move || passwords.verify(&payload.password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {e}")))?
        .map_err(|e| {
            error!(error = %e, account_id = account.id, "Password verification error");
            ApiError::internal(e.to_string())
        })?;

    if !verified {
        info!(account_id = account.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let token = state.jwt_service.issue_token(account.number)?;
    info!(account_id = account.id, "Account logged in");

    Ok(Json(LoginResponse {
        number: account.number,
        token,
    }))
}
