//! Pixmill Core Library
//!
//! This crate provides the format registry, error types, response models and
//! configuration shared by the processing and API crates.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::{content_type, resolve_format, ImageType};
pub use models::{ApiResponse, HealthStatus, ImageInfo, ServiceInfo};
