//! Re-encoding of bitmaps back into the source's format.
//!
//! This module provides functionality for:
//! - Encoding to JPEG with a quality fraction
//! - Encoding to PNG, losslessly, with quality selecting deflate effort
//!
//! The output format always equals the input format. There is no conversion.
//!
//! # Examples
//!
//! ```ignore
//! use pixshrink_core::encode::encode;
//! use pixshrink_core::{MediaType, Quality};
//!
//! let result = encode(&bitmap, MediaType::Jpeg, Quality::from_percent(80)).unwrap();
//! println!("Encoded {} bytes", result.len());
//! ```

mod jpeg;
mod png;

use std::sync::Arc;

use thiserror::Error;

use crate::decode::Bitmap;
use crate::{MediaType, Quality};

pub use jpeg::{encode_jpeg, jpeg_quality};
pub use png::{encode_png, png_compression};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// The output of one successful encode.
///
/// Cloning is cheap: the payload is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedResult {
    bytes: Arc<[u8]>,
    media_type: MediaType,
    quality: Quality,
    width: u32,
    height: u32,
}

impl EncodedResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_arc(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Quality the bytes were encoded at.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Dimensions of the encoded raster, after any downscaling.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Encode a bitmap as `media_type` at `quality`.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for zero-area bitmaps,
/// `EncodeError::InvalidPixelData` for mismatched buffers, and
/// `EncodeError::EncodingFailed` if the codec itself fails.
pub fn encode(
    bitmap: &Bitmap,
    media_type: MediaType,
    quality: Quality,
) -> Result<EncodedResult, EncodeError> {
    let bytes = match media_type {
        MediaType::Jpeg => encode_jpeg(bitmap, quality)?,
        MediaType::Png => encode_png(bitmap, quality)?,
    };

    Ok(EncodedResult {
        bytes: bytes.into(),
        media_type,
        quality,
        width: bitmap.width,
        height: bitmap.height,
    })
}

fn validate_bitmap(bitmap: &Bitmap) -> Result<(), EncodeError> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    let expected = bitmap.pixel_count() * Bitmap::CHANNELS;
    if bitmap.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: bitmap.pixels.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_media_type() {
        let bmp = Bitmap::filled(12, 8, [30, 60, 90, 255]);

        for media in MediaType::ALL {
            let result = encode(&bmp, media, Quality::default()).unwrap();
            assert_eq!(result.media_type(), media);
            assert_eq!(result.dimensions(), (12, 8));
            assert_eq!(result.len(), result.bytes().len() as u64);
            assert!(!result.is_empty());
        }
    }

    #[test]
    fn test_encode_records_quality() {
        let bmp = Bitmap::filled(4, 4, [0, 0, 0, 255]);
        let result = encode(&bmp, MediaType::Jpeg, Quality::from_percent(35)).unwrap();
        assert_eq!(result.quality().percent(), 35);
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::InvalidDimensions {
            width: 0,
            height: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (3) must be non-zero"
        );
    }
}
