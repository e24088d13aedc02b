//! JWT token generation and validation.
//!
//! Tokens are HS256-signed and bind a session to one account number.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::SessionClaims;

/// How long an issued token stays valid.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// No signing secret is configured.
    #[error("signing secret is not configured")]
    MissingSecret,

    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is signed with an unexpected algorithm or key.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    has_secret: bool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("has_secret", &self.has_secret)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service signing with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            has_secret: !secret.is_empty(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `account_number`, valid for [`TOKEN_VALIDITY_HOURS`].
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if the service has no secret and
    /// `JwtError::EncodingError` if signing fails.
    pub fn issue_token(&self, account_number: i64) -> Result<String, JwtError> {
        if !self.has_secret {
            return Err(JwtError::MissingSecret);
        }

        let expires_at = Utc::now() + Duration::hours(TOKEN_VALIDITY_HOURS);
        let claims = SessionClaims::new(account_number, expires_at);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::Invalid` for a bad signature or algorithm, and
    /// `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        if !self.has_secret {
            return Err(JwtError::MissingSecret);
        }

        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::Invalid,
                    _ => JwtError::DecodingError(e.to_string()),
                }
            })
    }
}
