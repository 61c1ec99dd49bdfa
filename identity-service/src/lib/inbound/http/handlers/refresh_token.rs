use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

/// Exchange a token that is close to or shortly past expiry for a new one.
///
/// Public: an expired token would never pass the gate.
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .refresh_token(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|issued| ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequestBody {
    token: String,
}
