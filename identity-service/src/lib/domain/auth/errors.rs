use auth::TokenError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Errors raised by login, refresh and token authorization.
///
/// `AuthenticationFailed` deliberately hides whether the email was unknown
/// or the password wrong. The specific reason is only logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    AuthenticationFailed,

    #[error("token expired")]
    Expired,

    #[error("token not eligible for refresh yet")]
    NotEligibleForRefresh,

    #[error("token too old to refresh")]
    TokenTooOld,

    #[error("invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("request cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Cancelled(reason) => AuthError::Cancelled(reason),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
