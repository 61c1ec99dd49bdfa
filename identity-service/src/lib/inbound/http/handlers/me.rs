use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

pub async fn me(CurrentUser(identity): CurrentUser) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user_id: identity.user_id,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user_id: String,
}
