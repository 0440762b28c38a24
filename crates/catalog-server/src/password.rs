//! Salted one-way hashing of account secrets.
//!
//! Hashes are argon2id PHC strings with a fresh random salt, so hashing the
//! same secret twice gives different strings that both verify. The cost
//! parameters are the `argon2` crate defaults and never vary per account.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use std::sync::LazyLock;

use rand_core::OsRng;
use thiserror::Error;

/// Hash checked against when a login names no account, so that a miss costs
/// the same verify as a wrong secret. Built on first use.
static DECOY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_secret("catalog decoy secret").ok());

#[derive(Debug, Error)]
pub enum HashError {
  #[error("password hashing failed: {0}")]
  Hash(String),
  #[error("hashing task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// Hash `secret` with a fresh salt.
pub fn hash_secret(secret: &str) -> Result<String, HashError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(secret.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| HashError::Hash(e.to_string()))
}

/// Check `secret` against a stored PHC string.
///
/// `Ok(false)` means the secret does not match. A stored hash that cannot be
/// parsed is an error, not a mismatch.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, HashError> {
  let parsed = PasswordHash::new(hash).map_err(|e| HashError::Hash(e.to_string()))?;
  match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(password_hash::Error::Password) => Ok(false),
    Err(e) => Err(HashError::Hash(e.to_string())),
  }
}

/// [`hash_secret`] on the blocking pool.
pub async fn hash_secret_blocking(secret: String) -> Result<String, HashError> {
  tokio::task::spawn_blocking(move || hash_secret(&secret)).await?
}

/// [`verify_secret`] on the blocking pool.
pub async fn verify_secret_blocking(
  secret: String,
  hash: String,
) -> Result<bool, HashError> {
  tokio::task::spawn_blocking(move || verify_secret(&secret, &hash)).await?
}

/// Run a full verify against [`DECOY_HASH`] on the blocking pool. The
/// outcome is discarded; only the time spent matters.
pub async fn verify_decoy_blocking(secret: String) -> Result<(), HashError> {
  tokio::task::spawn_blocking(move || {
    let decoy = DECOY_HASH
      .as_deref()
      .ok_or_else(|| HashError::Hash("decoy hash unavailable".into()))?;
    verify_secret(&secret, decoy).map(|_| ())
  })
  .await?
}
