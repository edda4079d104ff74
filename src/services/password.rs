//! Password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

/// One-way salted password hashing with a fixed work factor (argon2 defaults)
#[derive(Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Hash a plaintext password. Failure is fatal to the calling operation.
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A malformed stored hash verifies as `false` rather than erroring.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hasher = PasswordHasher;
        let hash = hasher.hash("secret1").unwrap();
        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = PasswordHasher;
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false_without_error() {
        let hasher = PasswordHasher;
        assert!(!hasher.verify("secret1", "not-a-valid-hash"));
        assert!(!hasher.verify("secret1", ""));
    }
}
