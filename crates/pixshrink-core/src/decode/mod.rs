//! Image decoding and downscaling for pixshrink.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG bytes into RGBA bitmaps
//! - Honoring EXIF orientation the way browsers do
//! - Downscaling bitmaps so the longest edge stays within a limit
//!
//! # Architecture
//!
//! Decoding runs inside one pipeline run and its output is discarded once the
//! run has encoded. All operations are synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use pixshrink_core::decode::{decode, resize, FilterType, MAX_DIMENSION};
//! use pixshrink_core::MediaType;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let bitmap = decode(&bytes, MediaType::Jpeg).unwrap();
//! let fitted = resize(&bitmap, MAX_DIMENSION, FilterType::Bilinear).unwrap();
//! println!("{}x{} -> {}x{}", bitmap.width, bitmap.height, fitted.width, fitted.height);
//! ```

mod decoder;
mod resize;
mod types;

#[cfg(test)]
pub(crate) use decoder::fixtures;
pub use decoder::{decode, read_orientation};
pub use resize::{fit_dimensions, resize, resize_exact, MAX_DIMENSION};
pub use types::{Bitmap, DecodeError, FilterType, Orientation};
