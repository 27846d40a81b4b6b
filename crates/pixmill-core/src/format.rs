//! Format registry
//!
//! Single place where user-facing format tokens, internal image types and
//! HTTP content types are mapped onto each other. Handlers never compare
//! format strings themselves; they go through this module.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Content type returned when nothing more specific is known.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Encodings understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Gif,
    Heif,
}

impl ImageType {
    pub const ALL: [ImageType; 6] = [
        ImageType::Jpeg,
        ImageType::Png,
        ImageType::WebP,
        ImageType::Tiff,
        ImageType::Gif,
        ImageType::Heif,
    ];

    /// Parse a format token ("jpeg", "JPG", " png ", ...).
    ///
    /// The error carries the token exactly as the caller sent it.
    pub fn parse(token: &str) -> Result<Self, AppError> {
        match token.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageType::Jpeg),
            "png" => Ok(ImageType::Png),
            "webp" => Ok(ImageType::WebP),
            "tiff" => Ok(ImageType::Tiff),
            "gif" => Ok(ImageType::Gif),
            "heif" | "heic" => Ok(ImageType::Heif),
            _ => Err(AppError::UnsupportedFormat(token.to_string())),
        }
    }

    /// Canonical token for this type
    pub fn token(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpeg",
            ImageType::Png => "png",
            ImageType::WebP => "webp",
            ImageType::Tiff => "tiff",
            ImageType::Gif => "gif",
            ImageType::Heif => "heif",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::WebP => "image/webp",
            ImageType::Tiff => "image/tiff",
            ImageType::Gif => "image/gif",
            ImageType::Heif => "image/heif",
        }
    }

    /// Reverse lookup from a MIME type. Parameters after `;` are ignored.
    pub fn from_mime_type(content_type: &str) -> Option<Self> {
        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_lowercase();
        match normalized.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageType::Jpeg),
            "image/png" => Some(ImageType::Png),
            "image/webp" => Some(ImageType::WebP),
            "image/tiff" => Some(ImageType::Tiff),
            "image/gif" => Some(ImageType::Gif),
            "image/heif" | "image/heic" | "image/heif-sequence" | "image/heic-sequence" => {
                Some(ImageType::Heif)
            }
            _ => None,
        }
    }

    pub fn is_heif(self) -> bool {
        self == ImageType::Heif
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for ImageType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageType::parse(s)
    }
}

/// Resolve a format token to an image type.
pub fn resolve_format(token: &str) -> Result<ImageType, AppError> {
    ImageType::parse(token)
}

/// Content type for an optional image type; unknown falls back to JPEG.
pub fn content_type(image_type: Option<ImageType>) -> &'static str {
    image_type
        .map(ImageType::to_mime_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
