//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixmill_core::Config;
use std::sync::Arc;

/// Validate configuration, build the shared state and the router.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let state = Arc::new(AppState::new(config));
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
