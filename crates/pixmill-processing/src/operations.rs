//! Image operation service
//!
//! Each operation takes a buffered upload, runs one transform and packages the
//! encoded result with metadata measured from the output itself.

use crate::codec;
use crate::heif;
use crate::trim::{trim_borders, DEFAULT_TRIM_THRESHOLD};
use bytes::Bytes;
use image::imageops::FilterType;
use image::DynamicImage;
use pixmill_core::{content_type, resolve_format, AppError, Config, ImageInfo, ImageType};

/// Tunables shared by every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingOptions {
    pub default_width: u32,
    pub default_height: u32,
    pub default_quality: u8,
    pub max_dimension: u32,
    pub trim_threshold: u8,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ProcessingOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_width: config.default_width,
            default_height: config.default_height,
            default_quality: config.default_quality,
            max_dimension: config.max_dimension,
            trim_threshold: DEFAULT_TRIM_THRESHOLD,
        }
    }
}

/// Encoded output of an operation
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Bytes,
    pub image_type: ImageType,
    pub metadata: ImageInfo,
}

impl ProcessedImage {
    /// `format` is the token reported in metadata: the caller's own token
    /// when one was honoured, the canonical one otherwise.
    fn new(data: Vec<u8>, image_type: ImageType, format: String) -> Self {
        let (width, height) = codec::measure(&data);
        let metadata = ImageInfo::new(width, height, data.len(), format);
        Self {
            data: Bytes::from(data),
            image_type,
            metadata,
        }
    }

    pub fn content_type(&self) -> &'static str {
        content_type(Some(self.image_type))
    }
}

/// Clamp a caller-supplied quality into 1..=100, using `default` when it is
/// absent or out of range.
pub fn normalize_quality(requested: Option<i64>, default: u8) -> u8 {
    match requested {
        Some(q) if (1..=100).contains(&q) => q as u8,
        _ => default,
    }
}

fn requested_token(format: Option<&str>) -> Option<&str> {
    format.map(str::trim).filter(|t| !t.is_empty())
}

/// Resolve a caller token, keeping its lowercase spelling for metadata.
fn resolve_requested(token: &str) -> Result<(ImageType, String), AppError> {
    let image_type = resolve_format(token)?;
    Ok((image_type, token.to_lowercase()))
}

fn canonical(image_type: ImageType) -> (ImageType, String) {
    (image_type, image_type.token().to_string())
}

/// Output type used when the caller did not pick one
fn fallback_type(data: &[u8]) -> ImageType {
    codec::detect_type(data)
        .filter(|t| codec::is_encodable(*t))
        .unwrap_or(ImageType::Jpeg)
}

/// Decode any supported upload, routing HEIF containers through libheif.
fn decode_input(data: &[u8]) -> Result<DynamicImage, AppError> {
    match codec::detect_type(data) {
        Some(t) if t.is_heif() => heif::decode(data),
        _ => codec::decode(data),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageOperations {
    options: ProcessingOptions,
}

impl ImageOperations {
    pub fn new(options: ProcessingOptions) -> Self {
        Self { options }
    }

    /// Scale to exactly `width`×`height`; zero edges take the configured defaults.
    ///
    /// A `format` that does not resolve is ignored and the input's own format
    /// is kept (JPEG when that cannot be written).
    pub fn resize(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: Option<&str>,
    ) -> Result<ProcessedImage, AppError> {
        let width = if width == 0 { self.options.default_width } else { width };
        let height = if height == 0 { self.options.default_height } else { height };

        if width > self.options.max_dimension || height > self.options.max_dimension {
            return Err(AppError::InvalidInput(format!(
                "Dimensions {}x{} exceed maximum of {}",
                width, height, self.options.max_dimension
            )));
        }

        let (target, label) = match requested_token(format).map(resolve_requested) {
            Some(Ok(resolved)) => resolved,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Ignoring unresolvable resize format");
                canonical(fallback_type(data))
            }
            None => canonical(fallback_type(data)),
        };

        let img = decode_input(data)?;
        tracing::debug!(
            from_width = img.width(),
            from_height = img.height(),
            width = width,
            height = height,
            format = %target,
            "Resizing image"
        );

        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        let encoded = codec::encode(&resized, target, self.options.default_quality)?;
        Ok(ProcessedImage::new(encoded, target, label))
    }

    /// Re-encode into the requested format at `quality`.
    ///
    /// HEIC/HEIF input is first turned into a JPEG intermediate.
    pub fn convert(
        &self,
        data: &[u8],
        input_content_type: &str,
        format: Option<&str>,
        quality: Option<i64>,
    ) -> Result<ProcessedImage, AppError> {
        let token = requested_token(format)
            .ok_or_else(|| AppError::BadRequest("format is required".to_string()))?;
        let (target, label) = resolve_requested(token)?;
        let quality = normalize_quality(quality, self.options.default_quality);

        let is_heif_input = ImageType::from_mime_type(input_content_type)
            .map(ImageType::is_heif)
            .unwrap_or(false);

        let img = if is_heif_input {
            tracing::debug!("Transcoding HEIF input to JPEG intermediate");
            codec::decode(&heif::transcode_to_jpeg(data)?)?
        } else {
            codec::decode(data)?
        };

        tracing::debug!(format = %target, quality = quality, "Converting image");
        let encoded = codec::encode(&img, target, quality)?;
        Ok(ProcessedImage::new(encoded, target, label))
    }

    /// Crop uniform borders. An invalid `format` is rejected; when absent the
    /// input's own format is kept.
    pub fn remove_background(
        &self,
        data: &[u8],
        format: Option<&str>,
    ) -> Result<ProcessedImage, AppError> {
        let (target, label) = match requested_token(format) {
            Some(token) => resolve_requested(token)?,
            None => canonical(fallback_type(data)),
        };

        let img = decode_input(data)?;
        let trimmed = trim_borders(&img, self.options.trim_threshold);
        tracing::debug!(
            from_width = img.width(),
            from_height = img.height(),
            width = trimmed.width(),
            height = trimmed.height(),
            format = %target,
            "Trimmed image borders"
        );

        let encoded = codec::encode(&trimmed, target, self.options.default_quality)?;
        Ok(ProcessedImage::new(encoded, target, label))
    }
}
