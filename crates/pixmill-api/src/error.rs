//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; every failure is
//! rendered as the standard envelope `{success:false, message, data:{code}}`.
//! Outside production, non-sensitive errors also carry `error_type` and
//! `details` in `data`.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    BoxError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixmill_core::{ApiResponse, AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

/// Payload carried in `data` of an error envelope
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Machine-readable error code for programmatic handling
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pixmill-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Failed to parse form data: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Failed to parse form data: {}",
            err.body_text()
        )))
    }
}

impl From<tokio::task::JoinError> for HttpAppError {
    fn from(err: tokio::task::JoinError) -> Self {
        HttpAppError(AppError::Internal(format!("Processing task failed: {}", err)))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

/// Failures raised by tower middleware rather than handlers
pub async fn handle_middleware_error(err: BoxError) -> HttpAppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        HttpAppError(AppError::Timeout)
    } else {
        HttpAppError(AppError::Internal(format!("Unhandled middleware error: {}", err)))
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    fn render(self, is_production: bool) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let details = if is_production || app_error.is_sensitive() {
            ErrorDetails {
                code: app_error.error_code(),
                error_type: None,
                details: None,
            }
        } else {
            ErrorDetails {
                code: app_error.error_code(),
                error_type: Some(app_error.error_type()),
                details: Some(app_error.detailed_message()),
            }
        };

        let body = ApiResponse::failure(app_error.client_message(), Some(details));
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        self.render(is_production_env())
    }
}
