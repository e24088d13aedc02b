//! Account ownership gate for per-account routes.

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use bankline_core::account::Account;
use tracing::{error, warn};

use crate::{AppState, error::ApiError};

/// The account a request has proven it owns.
///
/// Inserted by [`require_account_owner`]; handlers take it as an extractor
/// instead of looking the account up again.
#[derive(Debug, Clone)]
pub struct AuthorizedAccount {
    /// Account number from the verified token.
    pub account_number: i64,
    /// The addressed account, as loaded by the gate.
    pub account: Account,
}

/// Extracts the token from the Authorization header.
///
/// Accepts both `Bearer <token>` and a bare token. `Ok(None)` means no token
/// was sent; a header that is not visible ASCII is rejected outright.
fn extract_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = raw
        .to_str()
        .map_err(|_| {
            warn!("Authorization header is not visible ASCII");
            ApiError::unauthorized("Unauthorized")
        })?
        .trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    Ok((!token.is_empty()).then_some(token))
}

/// Middleware binding a bearer token to the account addressed by `{id}`.
///
/// Must be installed with `route_layer` on a route that has an `{id}`
/// segment. Steps, each short-circuiting:
/// 1. Token present, else 401 `Missing token` (401 `Unauthorized` if the
///    header cannot be read)
/// 2. Token verifies, else 401 `Unauthorized`
/// 3. `{id}` parses, else 400
/// 4. Account exists, else 404
/// 5. Claimed account number equals the account's number, else 403
pub async fn require_account_owner(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(request.headers())? else {
        return Err(ApiError::unauthorized("Missing token"));
    };

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        warn!(error = %e, "JWT verification failed");
        ApiError::unauthorized("Unauthorized")
    })?;

    let id: i32 = raw_id.parse().map_err(|_| {
        warn!(id = %raw_id, "Invalid account id in path");
        ApiError::bad_request("Invalid account id")
    })?;

    let account = match state.accounts.get(id).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            warn!(account_id = id, "Account not found");
            return Err(ApiError::not_found("Account not found"));
        }
        Err(e) => {
            error!(error = %e, account_id = id, "Failed to fetch account");
            return Err(e.into());
        }
    };

    // Fail closed: an unreadable claim is treated the same as a mismatch
    let Some(account_number) = claims.account_number() else {
        warn!(account_id = id, "Token carries no usable account number");
        return Err(ApiError::forbidden());
    };
    if account_number != account.number {
        warn!(
            account_id = id,
            claimed = account_number,
            "Token does not own the requested account"
        );
        return Err(ApiError::forbidden());
    }

    request.extensions_mut().insert(AuthorizedAccount {
        account_number,
        account,
    });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthorizedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}
