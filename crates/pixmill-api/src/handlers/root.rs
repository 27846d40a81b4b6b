use crate::error::HttpAppError;
use axum::Json;
use pixmill_core::{ApiResponse, AppError, ServiceInfo};

pub const ENDPOINTS: &str = "/resize, /convert, /trim, /health";

pub async fn service_info() -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::ok(
        "Image Processing API is running",
        ServiceInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: ENDPOINTS.to_string(),
        },
    ))
}

/// Fallback for a known path hit with the wrong method
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}

/// Fallback for unknown paths
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound)
}
