//! Access log middleware
//!
//! Builds one [`AccessLog`] record per request and emits it as a single
//! structured event once the response status is known.

use super::request_id::get_request_id;
use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// Canonical log line for a single request
#[derive(Debug, Clone)]
pub struct AccessLog {
    pub method: String,
    pub uri: String,
    pub remote_addr: Option<String>,
    pub request_id: Option<String>,
    status: Option<StatusCode>,
    started: Instant,
}

impl AccessLog {
    pub fn from_request(request: &Request) -> Self {
        let remote_addr = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.to_string())
            });

        Self {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            remote_addr,
            request_id: get_request_id(request).map(ToString::to_string),
            status: None,
            started: Instant::now(),
        }
    }

    /// Record the response status. Only the first call has any effect.
    pub fn record_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    pub fn emit(&self) {
        let status = self.status.map(|s| s.as_u16()).unwrap_or(0);
        let duration_ms = self.started.elapsed().as_millis() as u64;
        let remote_addr = self.remote_addr.as_deref().unwrap_or("-");
        let request_id = self.request_id.as_deref().unwrap_or("-");

        if status >= 500 {
            tracing::warn!(
                method = %self.method,
                uri = %self.uri,
                remote_addr,
                request_id,
                status,
                duration_ms,
                "request completed"
            );
        } else {
            tracing::info!(
                method = %self.method,
                uri = %self.uri,
                remote_addr,
                request_id,
                status,
                duration_ms,
                "request completed"
            );
        }
    }
}

pub async fn access_log_middleware(request: Request, next: Next) -> Response {
    let mut log = AccessLog::from_request(&request);
    let response = next.run(request).await;
    log.record_status(response.status());
    log.emit();
    response
}
