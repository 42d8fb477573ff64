//! Health check endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (checks the storage backend)
//! - /health/live - Liveness probe (always OK while the process serves)

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn status(status: &str, checks: Option<HealthChecks>) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(status("healthy", None))
}

/// Readiness probe; 503 while the storage backend is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match state.users.ping().await {
        Ok(()) => {
            let storage = CheckStatus {
                status: "healthy".to_string(),
                message: None,
            };
            Ok(Json(status("ready", Some(HealthChecks { storage }))))
        }
        Err(e) => {
            let storage = CheckStatus {
                status: "unhealthy".to_string(),
                message: Some(e.to_string()),
            };
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(status("not_ready", Some(HealthChecks { storage }))),
            ))
        }
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(status("alive", None))
}
