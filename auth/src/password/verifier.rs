use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash with the default cost parameters that no
/// password maps to. Verifying against it costs the same as a real check.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// One-way credential hashing and verification.
///
/// Hashes are PHC strings (Argon2id) that carry their own algorithm,
/// cost parameters and salt, so verification needs nothing but the
/// stored string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialVerifier;

impl CredentialVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 could not produce a hash
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored hash.
    ///
    /// The digest comparison inside `argon2` is constant time.
    ///
    /// # Errors
    /// * `VerificationFailed` - The stored hash is not a valid PHC string
    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spend one verification's worth of work for a credential that has
    /// no stored hash. Always returns `false`.
    pub fn verify_absent(&self, plain: &str) -> bool {
        let _ = self.verify(plain, DECOY_HASH);
        false
    }
}
