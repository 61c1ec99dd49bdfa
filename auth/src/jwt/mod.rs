pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::ClaimSet;
pub use claims::AUDIENCE;
pub use claims::ISSUER;
pub use codec::TokenCodec;
pub use errors::TokenError;
