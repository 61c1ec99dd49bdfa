use chrono::DateTime;
use chrono::Utc;

use crate::jwt::ClaimSet;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::CredentialVerifier;
use crate::password::PasswordError;
use crate::policy::RefreshError;
use crate::policy::TokenPolicy;

/// Authentication coordinator combining credential verification, token
/// signing and the token lifetime policy.
///
/// Holds the signing keys; share it behind an `Arc`. All methods take
/// `&self` and keep no mutable state.
pub struct Authenticator {
    credential_verifier: CredentialVerifier,
    token_codec: TokenCodec,
    policy: TokenPolicy,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator with the default refresh policy.
    ///
    /// # Arguments
    /// * `secret` - Shared HS256 signing secret
    pub fn new(secret: &[u8]) -> Self {
        Self::with_policy(secret, TokenPolicy::default())
    }

    pub fn with_policy(secret: &[u8], policy: TokenPolicy) -> Self {
        Self {
            credential_verifier: CredentialVerifier::new(),
            token_codec: TokenCodec::new(secret),
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.credential_verifier.hash(password)
    }

    /// Verify a password and sign `claims` when it matches.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored PHC hash
    /// * `claims` - Claims to sign on success
    ///
    /// # Returns
    /// Signed compact token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `TokenError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &ClaimSet,
    ) -> Result<String, AuthenticationError> {
        if !self.credential_verifier.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_codec.issue(claims)?)
    }

    /// Burn the cost of a password check for an account that does not exist.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.credential_verifier.verify_absent(password);
        AuthenticationError::InvalidCredentials
    }

    /// Sign claims without a password check (refresh flows).
    pub fn issue_token(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        self.token_codec.issue(claims)
    }

    /// Verify signature and claim shape. Expiry is not checked.
    pub fn decode_token(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.token_codec.decode(token)
    }

    pub fn is_live(&self, claims: &ClaimSet, now: DateTime<Utc>) -> bool {
        self.policy.is_live(claims, now)
    }

    pub fn check_refresh(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), RefreshError> {
        self.policy.check_refresh(claims, now)
    }
}
