//! Shared application state

use chrono::{DateTime, Utc};
use pixmill_core::Config;
use pixmill_processing::{ImageOperations, ProcessingOptions};
use std::sync::Arc;

/// Read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub operations: ImageOperations,
    /// When the process started serving; reported by `/health`
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let operations = ImageOperations::new(ProcessingOptions::from_config(&config));
        Self {
            config: Arc::new(config),
            operations,
            started_at: Utc::now(),
        }
    }
}
