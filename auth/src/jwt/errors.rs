use thiserror::Error;

/// Error type for token encoding and verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}
