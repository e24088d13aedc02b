//! Transfer endpoint.
//!
//! Accepts a transfer request and echoes it back. No balances are read or
//! written and the destination is not checked.

use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, extractors::ApiJson};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfer", post(transfer))
}

/// Transfer request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Destination account id.
    pub to_account_id: i32,
    /// Amount to move.
    pub amount: i64,
}

/// POST /transfer - Echo the request. Funds are not moved.
async fn transfer(ApiJson(payload): ApiJson<TransferRequest>) -> Json<TransferRequest> {
    info!(
        to_account_id = payload.to_account_id,
        amount = payload.amount,
        "Transfer requested; no funds moved"
    );
    Json(payload)
}
