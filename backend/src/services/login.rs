//! Login key verification.

use thiserror::Error;

use crate::repositories::{StoreError, UserStore};
use crate::utils::hashing::verify_login_key;

#[derive(Debug, Error)]
pub enum LoginError {
    /// The candidate is not 52 characters. Rejected before any store or
    /// hash work happens.
    #[error("invalid key format")]
    InvalidFormat,
    /// No stored hash matched the candidate.
    #[error("invalid key")]
    InvalidKey,
    #[error("hash verification failed")]
    Hash(#[source] anyhow::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Verifies a submitted login key and returns the matching user's id.
///
/// Login keys are salted-hashed, so there is no column to index on: every
/// stored hash is tried in turn until one verifies. The scan is linear in
/// the user count, which is fine at the populations this service sees.
pub async fn verify_login(users: &dyn UserStore, login_key: &str) -> Result<String, LoginError> {
    if login_key.len() != 52 {
        return Err(LoginError::InvalidFormat);
    }

    for credential in users.credentials().await? {
        if verify_login_key(login_key, &credential.login_key_hash).map_err(LoginError::Hash)? {
            return Ok(credential.id);
        }
    }

    Err(LoginError::InvalidKey)
}
