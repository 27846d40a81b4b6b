//! Image transform handlers
//!
//! Each handler buffers the upload through [`ImageUpload`], runs its operation
//! on the blocking pool and hands the result to the response shaper.

use crate::error::HttpAppError;
use crate::extract::ImageUpload;
use crate::response::{image_response, shape};
use crate::state::AppState;
use axum::{extract::State, response::Response};
use std::sync::Arc;

/// Resize handler
///
/// Fields (form, then query): `width`, `height`, `format`, `metadata`.
/// Missing or zero dimensions fall back to the configured defaults.
#[tracing::instrument(skip(state, upload), fields(operation = "resize"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    upload: ImageUpload,
) -> Result<Response, HttpAppError> {
    let width = upload.dimension("width");
    let height = upload.dimension("height");
    let format = upload.output_format().map(str::to_string);
    tracing::debug!(
        width = width,
        height = height,
        format = format.as_deref().unwrap_or(""),
        input_type = %upload.content_type,
        "Resize requested"
    );

    let operations = state.operations.clone();
    let data = upload.data.clone();
    let result = tokio::task::spawn_blocking(move || {
        operations.resize(&data, width, height, format.as_deref())
    })
    .await??;

    Ok(shape(
        result,
        upload.wants_metadata(),
        "Image resized successfully",
        &state.config.cache_control(),
    ))
}

/// Convert handler
///
/// Fields (form, then query): `format` (required), `quality`, `metadata`.
#[tracing::instrument(skip(state, upload), fields(operation = "convert"))]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    upload: ImageUpload,
) -> Result<Response, HttpAppError> {
    let format = upload.output_format().map(str::to_string);
    let quality = upload.quality();
    tracing::debug!(
        format = format.as_deref().unwrap_or(""),
        quality = ?quality,
        input_type = %upload.content_type,
        "Conversion requested"
    );

    let operations = state.operations.clone();
    let data = upload.data.clone();
    let input_type = upload.content_type.clone();
    let result = tokio::task::spawn_blocking(move || {
        operations.convert(&data, &input_type, format.as_deref(), quality)
    })
    .await??;

    Ok(shape(
        result,
        upload.wants_metadata(),
        "Image converted successfully",
        &state.config.cache_control(),
    ))
}

/// Trim handler; always responds with image bytes.
#[tracing::instrument(skip(state, upload), fields(operation = "trim"))]
pub async fn trim_image(
    State(state): State<Arc<AppState>>,
    upload: ImageUpload,
) -> Result<Response, HttpAppError> {
    let format = upload.output_format().map(str::to_string);
    tracing::debug!(
        format = format.as_deref().unwrap_or(""),
        input_type = %upload.content_type,
        "Trim requested"
    );

    let operations = state.operations.clone();
    let data = upload.data.clone();
    let result = tokio::task::spawn_blocking(move || {
        operations.remove_background(&data, format.as_deref())
    })
    .await??;

    Ok(image_response(result, &state.config.cache_control()))
}
