//! Password hashing with Argon2id.
//!
//! The work factor is configurable; `PasswordService::default()` uses the
//! argon2 crate's recommended parameters.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Work factor parameters rejected by argon2.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),
}

/// Argon2id hasher with a fixed work factor.
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordService {
    /// Creates a hasher with the given memory cost (KiB), passes, and lanes.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if argon2 rejects the combination.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns the PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use bankline_core::auth::PasswordService;
    ///
    /// let hash = PasswordService::default().hash("my_secure_password").unwrap();
    /// assert!(hash.starts_with("$argon2id$"));
    /// ```
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Verifies a password against a stored hash.
    ///
    /// The parameters embedded in the hash are used, so hashes produced
    /// under an older work factor keep verifying.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the hash format is invalid.
    /// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }
}
