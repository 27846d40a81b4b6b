//! Border trimming
//!
//! Crops away the uniform border around an image. The background colour is
//! taken from the top-left pixel; a pixel belongs to the content once any
//! channel differs from it by more than the threshold.

use image::{DynamicImage, GenericImageView, Rgba};

/// Per-channel tolerance used by the trim endpoint
pub const DEFAULT_TRIM_THRESHOLD: u8 = 10;

/// Bounding box `(x, y, width, height)` of the non-background content.
///
/// `None` when the whole image matches the background.
pub fn content_bounds(img: &DynamicImage, threshold: u8) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let rgba = img.to_rgba8();
    let background = *rgba.get_pixel(0, 0);
    let differs = |pixel: &Rgba<u8>| {
        pixel
            .0
            .iter()
            .zip(background.0.iter())
            .any(|(a, b)| a.abs_diff(*b) > threshold)
    };

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if !differs(pixel) {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Trim uniform borders; an all-background image is returned unchanged.
pub fn trim_borders(img: &DynamicImage, threshold: u8) -> DynamicImage {
    match content_bounds(img, threshold) {
        Some((x, y, width, height)) => img.crop_imm(x, y, width, height),
        None => img.clone(),
    }
}
