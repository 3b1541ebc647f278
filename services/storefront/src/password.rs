//! Password hashing with Argon2
//!
//! Hashing is CPU bound, so the async helpers run it on the blocking pool.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::sync::OnceLock;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash used when the email is unknown, so both login failure paths do the
/// same amount of work
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| hash_password("not-a-real-account").unwrap_or_default())
}

/// Hash on the blocking pool
pub async fn hash(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Verify on the blocking pool; `None` verifies against the dummy hash and
/// always yields `false`
pub async fn verify(password_hash: Option<String>, password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || match password_hash {
        Some(hash) => verify_password(&hash, &password),
        None => {
            let _ = verify_password(dummy_hash(), &password);
            Ok(false)
        }
    })
    .await?
}
