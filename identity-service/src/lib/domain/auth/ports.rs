use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::IssuedToken;

/// Port for token lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown email or wrong password (indistinguishable)
    /// * `Cancelled` - User lookup did not answer before the deadline
    /// * `Internal` - User store or token signing failed
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError>;

    /// Exchange a token near or shortly past its expiry for a new one.
    ///
    /// The presented token is not revoked.
    ///
    /// # Errors
    /// * `Token` - Token is malformed, forged or carries invalid claims
    /// * `NotEligibleForRefresh` - More than the refresh window before expiry
    /// * `TokenTooOld` - Past expiry by more than the staleness bound
    async fn refresh_token(&self, token: &str) -> Result<IssuedToken, AuthError>;

    /// Verify a bearer token for a protected request.
    ///
    /// # Errors
    /// * `Token` - Token is malformed, forged or carries invalid claims
    /// * `Expired` - Token is past its expiry
    fn authorize(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
