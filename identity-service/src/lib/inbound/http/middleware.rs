use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::Extensions;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension slot for the identity the gate proved. Private so that only
/// the gate can populate it.
#[derive(Debug, Clone)]
struct IdentitySlot(AuthenticatedIdentity);

/// Middleware that admits a request only with a live bearer token and
/// records the caller's identity in the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)?;

    let identity = state.auth_service.authorize(token).map_err(|e| {
        tracing::warn!(reason = %e, "Bearer token rejected");
        ApiError::Unauthorized("invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(IdentitySlot(identity));

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let header_value = req.headers().get(header::AUTHORIZATION).ok_or_else(|| {
        tracing::warn!("Authorization header missing");
        ApiError::Unauthorized("missing authorization header".to_string())
    })?;

    let invalid = || {
        tracing::warn!("Authorization header is not a bearer credential");
        ApiError::Unauthorized("invalid authorization header".to_string())
    };

    let value = header_value.to_str().map_err(|_| invalid())?;
    let token = value.strip_prefix(BEARER_PREFIX).ok_or_else(invalid)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(token)
}

/// Identity recorded by [`require_bearer`] for this request, if any.
pub fn authenticated_identity(extensions: &Extensions) -> Option<&AuthenticatedIdentity> {
    extensions.get::<IdentitySlot>().map(|slot| &slot.0)
}

/// Extractor for handlers behind the gate. Rejects with 401 when the gate
/// did not run.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticated_identity(&parts.extensions)
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("missing authenticated identity".to_string()))
    }
}
