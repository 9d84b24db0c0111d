//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::HealthCheckResult;

use crate::AppState;

pub const SERVICE_NAME: &str = "ACP Healthcare Insurance System";

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: &'static str,
    pub status: &'static str,
    pub documentation: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub store: HealthCheckResult,
}

/// Service banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} API", SERVICE_NAME),
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        documentation: "/health",
    })
}

/// Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check (includes the store)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let store = state.store.health_check().await;
    if store.is_healthy() {
        (StatusCode::OK, Json(ReadinessResponse { status: "ready", store }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "unavailable",
                store,
            }),
        )
    }
}
