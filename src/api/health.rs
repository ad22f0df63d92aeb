//! Health check endpoints for orchestrator probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::{AppState, PersonServiceTrait};
use crate::api::types::Json;

/// Health response with optional per-resource checks
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of probing one resource's store
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// Plain-text liveness message at the root path
pub async fn index() -> &'static str {
    "REST API works fine"
}

/// Returns 200 while the process is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: both stores must answer a ping
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![
        check_resource(state.users.as_ref()).await,
        check_resource(state.admins.as_ref()).await,
    ];

    let overall_status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_resource(service: &dyn PersonServiceTrait) -> HealthCheck {
    let start = Instant::now();
    let name = service.kind().table().to_string();

    match service.ping().await {
        Ok(()) => HealthCheck {
            name,
            status: HealthStatus::Healthy,
            message: None,
            latency_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => {
            tracing::warn!(resource = %name, error = %e, "Readiness check failed");

            HealthCheck {
                name,
                status: HealthStatus::Unhealthy,
                message: Some("store unavailable".to_string()),
                latency_ms: start.elapsed().as_millis() as u64,
            }
        }
    }
}
