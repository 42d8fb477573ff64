//! Route definitions for the Content Hub API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::AUTH_TOKEN_HEADER;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::uploads::UPLOADS_ROUTE;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

mod auth;
mod health;
mod hotel;
mod text;

#[cfg(test)]
mod test_support;

pub use auth::auth_routes;
pub use hotel::hotel_routes;
pub use text::text_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config().uploads.dir);
    let max_body = state.config().uploads.max_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api_routes())
        .nest_service(UPLOADS_ROUTE, uploads)
        // Apply middleware layers
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    header::CONTENT_TYPE,
                    HeaderName::from_static(AUTH_TOKEN_HEADER),
                ]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Content Hub API" }))
        .nest("/auth", auth::auth_routes())
        .nest("/hotel", hotel::hotel_routes())
        .nest("/text", text::text_routes())
}

/// Parse a path id; anything that is not a UUID names no resource
fn parse_id(raw: &str, not_found: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
