use crate::state::AppState;
use axum::{extract::State, Json};
use pixmill_core::models::rfc3339;
use pixmill_core::{ApiResponse, HealthStatus};
use std::sync::Arc;

/// Liveness check; `uptime` is the moment the service started.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(
        "Service is healthy",
        HealthStatus {
            uptime: rfc3339(state.started_at),
            status: "operational".to_string(),
        },
    ))
}
