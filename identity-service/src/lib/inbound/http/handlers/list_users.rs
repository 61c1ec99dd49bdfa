use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::Page;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<Vec<UserResponseData>>, ApiError> {
    let page = Page::new(query.limit, query.offset);

    state
        .user_service
        .list_users(page)
        .await
        .map_err(ApiError::from)
        .map(|profiles| {
            ApiSuccess::new(
                StatusCode::OK,
                profiles.iter().map(UserResponseData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}
