//! Content-type sniffing from magic bytes

use pixmill_core::{resolve_format, AppError};
use std::path::Path;

/// Number of leading bytes inspected when sniffing
pub const SNIFF_LEN: usize = 512;

/// Generic type reported when the signature is not recognised
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Sniff the MIME type of `data` from its first [`SNIFF_LEN`] bytes.
///
/// Unknown signatures yield [`OCTET_STREAM`].
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];
    infer::get(head)
        .map(|kind| kind.mime_type())
        .unwrap_or(OCTET_STREAM)
}

/// Determine the content type of an upload.
///
/// Magic bytes win; when they are inconclusive the file extension is passed
/// through the format registry instead. `data` is only read, never consumed.
pub fn detect_content_type(data: &[u8], filename: Option<&str>) -> Result<String, AppError> {
    let sniffed = sniff_content_type(data);
    tracing::debug!(content_type = sniffed, "Detected MIME type");

    if sniffed != OCTET_STREAM {
        return Ok(sniffed.to_string());
    }

    let extension = filename
        .map(Path::new)
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let image_type = resolve_format(extension)
        .map_err(|e| AppError::BadRequest(format!("Failed to get image type: {}", e)))?;

    tracing::debug!(
        extension = extension,
        content_type = image_type.to_mime_type(),
        "Resolved content type from file extension"
    );
    Ok(image_type.to_mime_type().to_string())
}
