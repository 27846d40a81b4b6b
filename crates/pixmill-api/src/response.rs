//! Response shaping: raw image bytes or a JSON metadata envelope

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pixmill_core::ApiResponse;
use pixmill_processing::ProcessedImage;

/// Render `result` as JSON metadata when `want_metadata` is set, otherwise as
/// the encoded image with content, length and cache headers.
pub fn shape(
    result: ProcessedImage,
    want_metadata: bool,
    message: &str,
    cache_control: &str,
) -> Response {
    if want_metadata {
        return (
            StatusCode::OK,
            Json(ApiResponse::ok(message, result.metadata)),
        )
            .into_response();
    }
    image_response(result, cache_control)
}

/// Encoded image with `Content-Type`, `Content-Length` and `Cache-Control`.
pub fn image_response(result: ProcessedImage, cache_control: &str) -> Response {
    let content_type = result.content_type();
    let length = result.data.len();

    let mut response = (StatusCode::OK, result.data).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    response
}
