use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::ClaimSet;

/// Why a token cannot be exchanged for a new one.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("Token not eligible for refresh yet")]
    NotYetEligible,

    #[error("Token too old to refresh")]
    TooOld,
}

/// Time-based decisions over decoded claims.
///
/// A token is live strictly before its expiry. It may be refreshed from
/// `refresh_window` before expiry up to `max_staleness` after it, both
/// ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    refresh_window: Duration,
    max_staleness: Duration,
}

impl TokenPolicy {
    pub fn new(refresh_window: Duration, max_staleness: Duration) -> Self {
        Self {
            refresh_window,
            max_staleness,
        }
    }

    pub fn refresh_window(&self) -> Duration {
        self.refresh_window
    }

    pub fn max_staleness(&self) -> Duration {
        self.max_staleness
    }

    /// True while `now` is before the token's expiry.
    pub fn is_live(&self, claims: &ClaimSet, now: DateTime<Utc>) -> bool {
        now < claims.expires_at
    }

    pub fn is_refresh_eligible(&self, claims: &ClaimSet, now: DateTime<Utc>) -> bool {
        self.check_refresh(claims, now).is_ok()
    }

    /// Decide whether a refresh may proceed, and why not if it may not.
    ///
    /// # Errors
    /// * `NotYetEligible` - More than `refresh_window` before expiry
    /// * `TooOld` - More than `max_staleness` past expiry
    pub fn check_refresh(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), RefreshError> {
        if now < claims.expires_at - self.refresh_window {
            return Err(RefreshError::NotYetEligible);
        }
        if now > claims.expires_at + self.max_staleness {
            return Err(RefreshError::TooOld);
        }
        Ok(())
    }
}

impl Default for TokenPolicy {
    /// One hour refresh window, seven days of staleness.
    fn default() -> Self {
        Self::new(Duration::hours(1), Duration::days(7))
    }
}
