//! Session claims and login payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// 2^53. Floats of this magnitude or more may have been rounded from a
/// neighbouring integer.
const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Claims carried by a session token.
///
/// `account_number` is kept as the raw JSON value: tokens minted by other
/// clients may encode it as a float, so it is only ever read through
/// [`SessionClaims::account_number`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Owning account's number.
    #[serde(default)]
    pub account_number: Value,
    /// Expiry as a Unix timestamp, duplicated from `exp` for older clients.
    #[serde(default)]
    pub expires_at: i64,
    /// Issued at timestamp.
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for an account number expiring at `expires_at`.
    #[must_use]
    pub fn new(account_number: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            account_number: Value::from(account_number),
            expires_at: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account number claim as an exact integer.
    ///
    /// Integral floats are accepted only while they convert without loss.
    /// Anything else yields `None`, which callers must treat as a denial.
    #[must_use]
    pub fn account_number(&self) -> Option<i64> {
        match &self.account_number {
            Value::Number(number) => exact_integer(number),
            _ => None,
        }
    }
}

fn exact_integer(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    float_to_exact_integer(number.as_f64()?)
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_exact_integer(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= MAX_EXACT_FLOAT_INTEGER {
        return None;
    }
    Some(value as i64)
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account number.
    pub number: i64,
    /// Plaintext password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Account number the token was issued for.
    pub number: i64,
    /// Signed session token.
    pub token: String,
}
