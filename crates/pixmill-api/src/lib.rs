//! Pixmill API Library
//!
//! HTTP handlers, upload extraction, response shaping, middleware and
//! application setup for the image service.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::HttpAppError;
pub use extract::ImageUpload;
pub use state::AppState;
