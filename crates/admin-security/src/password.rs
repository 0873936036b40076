//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    /// Hash a secret with a fresh random salt. The resulting PHC string
    /// embeds the salt and the Argon2 cost parameters.
    pub fn hash(secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Verify a secret against a stored PHC hash. Returns `Ok(false)` on a
    /// mismatch; errors only when the stored hash cannot be parsed.
    pub fn verify(secret: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = PasswordService::hash("pass123").unwrap();
        assert!(PasswordService::verify("pass123", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let hash = PasswordService::hash("pass123").unwrap();
        assert!(!PasswordService::verify("otra-clave", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = PasswordService::hash("pass123").unwrap();
        let second = PasswordService::hash("pass123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(PasswordService::verify("pass123", "no-es-un-hash").is_err());
    }
}
