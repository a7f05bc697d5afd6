//! Bitmaps and the small enums the decode stage works with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a source could not be turned into a bitmap.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Image data is empty")]
    Empty,

    /// Decoded to nothing, or a stage was asked for a zero-sized output.
    #[error("Unusable image dimensions")]
    InvalidFormat,

    /// The codec rejected the bytes.
    #[error("Could not decode image: {0}")]
    CorruptedFile(String),
}

/// Interpolation used when downscaling.
///
/// `Bilinear` is closest to what a canvas `drawImage` does with smoothing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Image;
        match self {
            FilterType::Nearest => Image::Nearest,
            FilterType::Bilinear => Image::Triangle,
            FilterType::Lanczos3 => Image::Lanczos3,
        }
    }
}

/// The EXIF `Orientation` tag, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    /// Out-of-range tag values are treated as upright.
    fn from(tag: u32) -> Self {
        use Orientation::*;
        match tag {
            2 => FlipHorizontal,
            3 => Rotate180,
            4 => FlipVertical,
            5 => Transpose,
            6 => Rotate90CW,
            7 => Transverse,
            8 => Rotate270CW,
            _ => Normal,
        }
    }
}

/// A decoded raster with RGBA pixel data.
///
/// Bitmaps only live for the duration of one pipeline run. They are never
/// cached between runs; every quality change decodes the source again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Bytes per pixel in the buffer.
    pub const CHANNELS: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "buffer does not hold {width}x{height} RGBA pixels"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * Self::CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self::new(width, height, pixels)
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage, or `None` if the buffer length is wrong.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// The longer of the two sides.
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True for zero-area bitmaps.
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0 || self.pixels.is_empty()
    }

    /// Whether any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels
            .chunks_exact(Self::CHANNELS)
            .any(|px| px[3] != u8::MAX)
    }
}
