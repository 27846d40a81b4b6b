//! Response envelope and payload models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Standard JSON envelope for every JSON body the service emits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

/// Measured facts about a transformed image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Encoded size in bytes
    pub size: usize,
    pub format: String,
    /// RFC3339 timestamp of when the result was produced
    pub modified: String,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32, size: usize, format: impl Into<String>) -> Self {
        Self {
            width,
            height,
            size,
            format: format.into(),
            modified: rfc3339(Utc::now()),
        }
    }
}

/// Payload of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub uptime: String,
    pub status: String,
}

/// Payload of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub version: String,
    pub endpoints: String,
}

/// Format a timestamp as RFC3339 with second precision and a `Z` suffix.
pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
