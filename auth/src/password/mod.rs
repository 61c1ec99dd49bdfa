pub mod errors;
pub mod verifier;

pub use errors::PasswordError;
pub use verifier::CredentialVerifier;
