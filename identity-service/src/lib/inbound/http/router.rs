use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::middleware::require_bearer;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
    };

    let public_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/register", post(register));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/users", get(list_users).post(register))
        .route("/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest(
            "/api/v1",
            Router::new().merge(public_routes).merge(protected_routes),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
