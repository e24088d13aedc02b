//! JSON error envelope for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bankline_core::account::{AccountError, StoreError};
use bankline_shared::{AppError, JwtError};
use serde_json::json;
use tracing::error;

/// Message returned to clients for any 5xx error.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// An [`AppError`] rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 403 with the generic `Forbidden` message.
    pub fn forbidden() -> Self {
        Self(AppError::Forbidden("Forbidden".to_string()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 500 with a detail that is logged but not returned.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self(AppError::Internal(detail.into()))
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateNumber(number) => Self(AppError::Conflict(format!(
                "account number {number} already exists"
            ))),
            StoreError::NumbersExhausted => {
                Self(AppError::Internal("account numbers exhausted".to_string()))
            }
            StoreError::Database(detail) => Self(AppError::Database(detail)),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::Store(e) => e.into(),
            e => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(error: JwtError) -> Self {
        Self(AppError::Internal(error.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
            INTERNAL_MESSAGE
        } else {
            self.0.message()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
