//! Codec glue: decode uploads, encode results, measure encoded output

use crate::sniff::sniff_content_type;
use image::{DynamicImage, ImageFormat, ImageReader};
use pixmill_core::{AppError, ImageType};
use std::io::Cursor;

pub(crate) fn processing_error(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::ImageProcessing(format!("{}: {}", context, err))
}

/// Decode an encoded image, guessing the container from its content.
pub fn decode(data: &[u8]) -> Result<DynamicImage, AppError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| processing_error("Failed to read image", e))?;
    reader
        .decode()
        .map_err(|e| processing_error("Failed to decode image", e))
}

/// Image type of an encoded buffer, if it is one the service knows.
pub fn detect_type(data: &[u8]) -> Option<ImageType> {
    ImageType::from_mime_type(sniff_content_type(data))
}

/// Whether results can be written in this type
pub fn is_encodable(image_type: ImageType) -> bool {
    !image_type.is_heif()
}

/// Width and height read back from an encoded buffer; (0, 0) when unreadable.
pub fn measure(data: &[u8]) -> (u32, u32) {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .unwrap_or((0, 0))
}

/// Encode `img` as `image_type`. `quality` (1-100) applies to lossy encoders.
pub fn encode(img: &DynamicImage, image_type: ImageType, quality: u8) -> Result<Vec<u8>, AppError> {
    let quality = quality.clamp(1, 100);
    match image_type {
        ImageType::Jpeg => encode_jpeg(img, quality),
        ImageType::WebP => encode_webp(img, quality),
        ImageType::Png => encode_with_image(&flatten(img), ImageFormat::Png),
        ImageType::Tiff => encode_with_image(&flatten(img), ImageFormat::Tiff),
        ImageType::Gif => encode_with_image(&DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::Gif),
        ImageType::Heif => Err(AppError::ImageProcessing(
            "Encoding to heif is not supported".to_string(),
        )),
    }
}

/// Reduce to 8-bit RGB(A) so every encoder accepts the buffer.
fn flatten(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn encode_with_image(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| processing_error("Failed to encode image", e))?;
    Ok(buffer)
}

/// Compress to JPEG using mozjpeg
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, AppError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| processing_error("Failed to encode jpeg", e))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| processing_error("Failed to encode jpeg", e))?;
    comp.finish()
        .map_err(|e| processing_error("Failed to encode jpeg", e))
}

/// libwebp rejects some inputs (edges over 16383 px), so use the fallible path.
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, AppError> {
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    encoder
        .encode_simple(false, quality as f32)
        .map(|memory| memory.to_vec())
        .map_err(|e| processing_error("Failed to encode webp", format!("{:?}", e)))
}
