use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::ClaimSet;
use super::claims::AUDIENCE;
use super::claims::ISSUER;
use super::errors::TokenError;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
const SIGNING_ALGORITHM_NAME: &str = "HS256";

/// Only the field needed to screen the declared algorithm.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Compact JWS codec for [`ClaimSet`]s, signed with HMAC-SHA256.
///
/// Decoding verifies structure, algorithm, signature and claim shape.
/// It does not look at the clock: whether a decoded token is still usable
/// is a [`TokenPolicy`](crate::policy::TokenPolicy) decision.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec bound to a shared signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration or a vault, never from code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a claim set into a URL-safe compact token.
    ///
    /// # Errors
    /// * `InvalidClaims` - The claim set breaks its own invariants
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn issue(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        claims.validate()?;

        jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return the claim set it carries.
    ///
    /// Expired tokens decode successfully.
    ///
    /// # Errors
    /// * `MalformedToken` - Not three segments, or the header is not base64 JSON
    /// * `UnsupportedAlgorithm` - Header declares anything other than HS256
    /// * `InvalidSignature` - Signature does not match the header and claims
    /// * `InvalidClaims` - Required claims missing, mistyped or inconsistent
    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenError> {
        screen_header(token)?;

        let claims = jsonwebtoken::decode::<ClaimSet>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)?;

        claims.validate()?;
        Ok(claims)
    }
}

/// Structural parse plus algorithm check, run before any MAC work.
fn screen_header(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(claims), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::MalformedToken);
    };

    if header.is_empty() || claims.is_empty() {
        return Err(TokenError::MalformedToken);
    }

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&header).map_err(|_| TokenError::MalformedToken)?;

    if header.alg != SIGNING_ALGORITHM_NAME {
        return Err(TokenError::UnsupportedAlgorithm(header.alg));
    }

    Ok(())
}

fn classify(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            TokenError::MalformedToken
        }
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => {
            TokenError::UnsupportedAlgorithm(SIGNING_ALGORITHM_NAME.to_string())
        }
        _ => TokenError::InvalidClaims(error.to_string()),
    }
}
