//! HEIC/HEIF input support
//!
//! The `image` crate cannot read HEIF containers, so HEIF uploads are decoded
//! through libheif (behind the `heif` feature) and re-encoded as a JPEG
//! intermediate before any other operation touches them.

use crate::codec;
use image::DynamicImage;
use pixmill_core::{AppError, ImageType};

/// Quality of the JPEG intermediate produced from HEIF input
pub const INTERMEDIATE_JPEG_QUALITY: u8 = 75;

/// Decode HEIF input and re-encode it as a JPEG buffer.
pub fn transcode_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = decode(data)?;
    codec::encode(&img, ImageType::Jpeg, INTERMEDIATE_JPEG_QUALITY)
}

#[cfg(feature = "heif")]
pub fn decode(data: &[u8]) -> Result<DynamicImage, AppError> {
    use image::RgbImage;
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let heif_error = |e: libheif_rs::HeifError| {
        AppError::ImageProcessing(format!("failed to decode HEIC: {}", e))
    };

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data).map_err(heif_error)?;
    let handle = ctx.primary_image_handle().map_err(heif_error)?;
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(heif_error)?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or_else(|| {
        AppError::ImageProcessing("failed to decode HEIC: no interleaved plane".to_string())
    })?;

    let row_len = plane.width as usize * 3;
    let mut pixels = Vec::with_capacity(row_len * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    RgbImage::from_raw(plane.width, plane.height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            AppError::ImageProcessing("failed to decode HEIC: truncated pixel data".to_string())
        })
}

#[cfg(not(feature = "heif"))]
pub fn decode(_data: &[u8]) -> Result<DynamicImage, AppError> {
    Err(AppError::ImageProcessing(
        "failed to decode HEIC: HEIF decoder not available in this build".to_string(),
    ))
}
