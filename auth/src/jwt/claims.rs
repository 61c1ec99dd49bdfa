use chrono::DateTime;
use chrono::Duration;
use chrono::Timelike;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// `iss` value stamped on every token this service issues.
pub const ISSUER: &str = "billing-service";

/// `aud` value stamped on every token this service issues.
pub const AUDIENCE: &str = "billing-api";

/// Identity and validity window carried by a token.
///
/// Field names on the wire follow RFC 7519 (`sub`, `iat`, `exp`, `iss`,
/// `aud`) plus a private `email` claim. Timestamps are whole Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(rename = "sub")]
    pub subject: String,

    pub email: String,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "aud")]
    pub audience: String,
}

impl ClaimSet {
    /// Build claims for `subject` valid from `issued_at` for `ttl`.
    ///
    /// `issued_at` is truncated to whole seconds so the claim set survives
    /// an encode/decode cycle unchanged.
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let issued_at = issued_at.with_nanosecond(0).unwrap_or(issued_at);

        Self {
            subject: subject.into(),
            email: email.into(),
            issued_at,
            expires_at: issued_at + ttl,
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
        }
    }

    /// Fresh claims for the same subject and email, issued at `now`.
    pub fn renewed(&self, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::new(self.subject.clone(), self.email.clone(), now, ttl)
    }

    /// Check the structural invariants of a claim set.
    ///
    /// # Errors
    /// * `InvalidClaims` - Empty subject or email, or `exp` not after `iat`
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.subject.trim().is_empty() {
            return Err(TokenError::InvalidClaims("empty subject".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(TokenError::InvalidClaims("empty email".to_string()));
        }
        if self.expires_at <= self.issued_at {
            return Err(TokenError::InvalidClaims(
                "expiration is not after issue time".to_string(),
            ));
        }
        Ok(())
    }
}
