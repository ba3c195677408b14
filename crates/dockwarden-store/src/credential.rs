//! Credential hashing with Argon2.
//!
//! Hashes are stored as PHC strings so the parameters travel with the hash.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, StoreError};

/// Hashes a plaintext credential with a fresh random salt.
///
/// # Errors
///
/// Returns [`StoreError::Credential`] if the hasher rejects the input.
pub fn hash_credential(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Credential {
            message: e.to_string(),
        })
}

/// Checks a plaintext credential against a stored hash.
///
/// A hash that does not parse never verifies.
#[must_use]
pub fn verify_credential(secret: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored credential hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

/// Secret behind [`absent_user_hash`].
const ABSENT_USER_SECRET: &str = "dockwarden-absent-user";

/// A real Argon2 hash with the default parameters, computed once. Logins
/// for unknown usernames verify against it, which costs the same as a
/// wrong credential for a known user.
#[must_use]
pub fn absent_user_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_credential(ABSENT_USER_SECRET).ok())
        .as_deref()
}

/// Runs one verification against [`absent_user_hash`]. Always false.
#[must_use]
pub fn verify_absent_user(secret: &str) -> bool {
    if let Some(hash) = absent_user_hash() {
        let _ = verify_credential(secret, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_same_secret() {
        let hash = hash_credential("s3cret-pass").expect("hash");
        assert!(verify_credential("s3cret-pass", &hash));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let hash = hash_credential("s3cret-pass").expect("hash");
        assert!(!verify_credential("other-pass", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_credential("same").expect("hash a");
        let b = hash_credential("same").expect("hash b");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_credential("anything", "not-a-phc-string"));
        assert!(!verify_credential("", ""));
    }

    #[test]
    fn absent_user_hash_is_a_real_hash() {
        let hash = absent_user_hash().expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_credential(ABSENT_USER_SECRET, hash));
        assert_eq!(absent_user_hash(), Some(hash));
    }

    #[test]
    fn absent_user_never_verifies() {
        assert!(!verify_absent_user(ABSENT_USER_SECRET));
        assert!(!verify_absent_user("admin123"));
    }
}
