// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Well-formed digest that no password matches. Verifying against it costs
/// the same as verifying a real one.
pub const UNKNOWN_USER_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hashing errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),

    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash `plaintext` with a fresh random salt into a PHC string.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hashing)
}

/// Check `plaintext` against a stored digest.
///
/// Returns `false` for a wrong password and for an unparseable digest alike;
/// callers only learn success or failure.
pub fn verify_password(digest: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        tracing::warn!("Stored password digest could not be parsed");
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking thread pool.
///
/// Argon2 is deliberately slow; running it inline would stall the runtime
/// worker serving the request.
pub async fn hash_password_blocking(plaintext: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext)).await?
}

/// [`verify_password`] on the blocking thread pool. A failed task counts as
/// a mismatch.
pub async fn verify_password_blocking(digest: String, plaintext: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&digest, &plaintext))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let digest = hash_password("test1234").unwrap();
        assert!(verify_password(&digest, "test1234"));
        assert!(!verify_password(&digest, "test12345"));
        assert!(!verify_password(&digest, ""));
    }

    #[test]
    fn test_digest_is_not_plaintext_and_is_salted() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert!(!a.contains("hunter2"));
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_password_hashes() {
        let digest = hash_password("").unwrap();
        assert!(verify_password(&digest, ""));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let digest = hash_password_blocking("test1234".to_string()).await.unwrap();
        assert!(verify_password_blocking(digest.clone(), "test1234".to_string()).await);
        assert!(!verify_password_blocking(digest, "nope".to_string()).await);
    }

    #[test]
    fn test_unknown_user_digest_parses_and_never_matches() {
        let parsed = PasswordHash::new(UNKNOWN_USER_DIGEST).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!verify_password(UNKNOWN_USER_DIGEST, "test1234"));
        assert!(!verify_password(UNKNOWN_USER_DIGEST, ""));
    }

    #[test]
    fn test_garbage_digest_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }
}
