//! Credential hashing
//!
//! Passwords are stored as Argon2id PHC strings. The hasher sits behind a
//! trait so services can be handed cheaper parameters in tests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::IdentityError;

/// Hashes and verifies user passwords
pub trait CredentialHasher: Send + Sync {
    /// Produces a self-describing hash string for storage
    fn hash(&self, password: &str) -> Result<String, IdentityError>;

    /// Returns true if `password` matches the stored hash
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, IdentityError>;
}

/// Argon2id hasher
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Creates a hasher with explicit cost parameters (memory in KiB, iterations, lanes)
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, IdentityError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| IdentityError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, IdentityError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("s3cret-pass", &hash).unwrap());
        assert!(!hasher.verify("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = cheap();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            cheap().verify("x", "not-a-phc-string"),
            Err(IdentityError::Hashing(_))
        ));
    }
}
