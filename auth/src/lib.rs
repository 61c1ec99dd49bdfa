//! Token and credential primitives for the identity service
//!
//! - Credential hashing (Argon2id, PHC strings)
//! - Compact signed tokens (HS256 JWS) carrying a typed [`ClaimSet`]
//! - Token lifetime policy (liveness, refresh window, staleness bound)
//! - An [`Authenticator`] that ties the three together
//!
//! Nothing here performs I/O or reads the clock on its own: callers pass
//! the current time into every time-dependent decision.
//!
//! # Examples
//!
//! ## Credential Hashing
//! ```
//! use auth::CredentialVerifier;
//!
//! let verifier = CredentialVerifier::new();
//! let hash = verifier.hash("secret1").unwrap();
//! assert!(verifier.verify("secret1", &hash).unwrap());
//! assert!(!verifier.verify("secret2", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{ClaimSet, TokenCodec};
//! use chrono::{Duration, Utc};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = ClaimSet::new("user123", "ana@x.com", Utc::now(), Duration::hours(24));
//! let token = codec.issue(&claims).unwrap();
//! assert_eq!(codec.decode(&token).unwrap(), claims);
//! ```
//!
//! ## Refresh Policy
//! ```
//! use auth::{ClaimSet, RefreshError, TokenPolicy};
//! use chrono::{Duration, Utc};
//!
//! let now = Utc::now();
//! let claims = ClaimSet::new("user123", "ana@x.com", now, Duration::hours(24));
//! let policy = TokenPolicy::default();
//!
//! assert!(policy.is_live(&claims, now));
//! assert_eq!(policy.check_refresh(&claims, now), Err(RefreshError::NotYetEligible));
//! assert!(policy.is_refresh_eligible(&claims, now + Duration::minutes(23 * 60 + 30)));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod policy;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::ClaimSet;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::CredentialVerifier;
pub use password::PasswordError;
pub use policy::RefreshError;
pub use policy::TokenPolicy;
