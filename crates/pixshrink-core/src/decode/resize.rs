//! Downscaling of decoded bitmaps before re-encoding.
//!
//! All functions return new `Bitmap` instances without modifying the input.

use super::{Bitmap, DecodeError, FilterType};

/// Longest edge a compressed image may have.
pub const MAX_DIMENSION: u32 = 1920;

/// Fit a bitmap within `max_dimension` on its longest edge, preserving aspect ratio.
///
/// Bitmaps that already fit come back with identical dimensions (a fresh
/// copy, the same as drawing onto a new canvas). Larger ones are scaled so the
/// longer side is exactly `max_dimension` and the shorter side is rounded to
/// the nearest pixel. That rounding can shift the aspect ratio by at most one
/// pixel. Images are never upscaled.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `max_dimension` is zero and
/// `DecodeError::CorruptedFile` if the buffer does not match the dimensions.
pub fn resize(
    bitmap: &Bitmap,
    max_dimension: u32,
    filter: FilterType,
) -> Result<Bitmap, DecodeError> {
    if max_dimension == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if bitmap.longest_edge() <= max_dimension {
        return Ok(bitmap.clone());
    }

    let (width, height) = fit_dimensions(bitmap.width, bitmap.height, max_dimension);
    resize_exact(bitmap, width, height, filter)
}

/// Resize a bitmap to exact dimensions, ignoring aspect ratio.
pub fn resize_exact(
    bitmap: &Bitmap,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Bitmap, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if bitmap.width == width && bitmap.height == height {
        return Ok(bitmap.clone());
    }

    let rgba = bitmap
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(Bitmap::from_rgba_image(resized))
}

/// Target dimensions for fitting `width`×`height` within `max_edge`.
///
/// Returns the input unchanged when it already fits.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
