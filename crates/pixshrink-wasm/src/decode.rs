//! Image decoding WASM bindings.
//!
//! Low-level access to the decode and resize stages, for hosts that want to
//! drive the pipeline themselves instead of going through `Compressor`.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode JPEG/PNG bytes into an RGBA bitmap
//! - [`resize_to_fit`] - Downscale so the longest edge fits a limit
//! - [`fit_dimensions`] - Compute target dimensions without touching pixels
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@pixshrink/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const bitmap = decode_image(bytes, file.type);
//! const fitted = resize_to_fit(bitmap, 1920, 1);
//! const imageData = new ImageData(new Uint8ClampedArray(fitted.pixels()), fitted.width);
//! ```

use crate::types::{filter_from_u8, media_type, JsBitmap};
use pixshrink_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes of the declared MIME type.
///
/// EXIF orientation is applied for JPEGs.
///
/// # Errors
///
/// Returns an error if the MIME type is not `image/jpeg` or `image/png`, or if
/// the bytes do not decode as that type.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], mime: &str) -> Result<JsBitmap, JsValue> {
    let media_type = media_type(mime).map_err(|e| JsValue::from_str(&e))?;
    decode::decode(bytes, media_type)
        .map(JsBitmap::from_bitmap)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Downscale so the longest edge is at most `max_dimension`, preserving aspect ratio.
///
/// Images that already fit are returned at their original size.
///
/// # Arguments
///
/// * `image` - The source bitmap
/// * `max_dimension` - Longest edge allowed (1920 in the default pipeline)
/// * `filter` - 0=Nearest, 1=Bilinear (default), 2=Lanczos3
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsBitmap,
    max_dimension: u32,
    filter: u8,
) -> Result<JsBitmap, JsValue> {
    decode::resize(&image.to_bitmap(), max_dimension, filter_from_u8(filter))
        .map(JsBitmap::from_bitmap)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Target `[width, height]` for fitting an image within `max_dimension`.
#[wasm_bindgen]
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> Vec<u32> {
    let (w, h) = decode::fit_dimensions(width, height, max_dimension);
    vec![w, h]
}


/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0, 1, 2, 3], "image/png").is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_unsupported_type() {
        assert!(decode_image(&[0, 1, 2, 3], "image/gif").is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_to_fit_landscape() {
        let img = JsBitmap::new(200, 100, vec![128u8; 200 * 100 * 4]);
        let resized = resize_to_fit(&img, 100, 1).unwrap();
        assert_eq!(resized.width(), 100);
        assert_eq!(resized.height(), 50);
    }

    #[wasm_bindgen_test]
    fn test_resize_to_fit_small_image_unchanged() {
        let img = JsBitmap::new(100, 100, vec![128u8; 100 * 100 * 4]);
        let resized = resize_to_fit(&img, 1920, 1).unwrap();
        assert_eq!(resized.width(), 100);
        assert_eq!(resized.height(), 100);
    }
}
