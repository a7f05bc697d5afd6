//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_image } from '@pixshrink/wasm';
//!
//! const bitmap = decode_image(bytes, 'image/jpeg');
//! const jpeg = encode_image(bitmap, 'image/jpeg', 0.8);
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use crate::types::{media_type, JsBitmap};
use pixshrink_core::{encode, Quality};
use wasm_bindgen::prelude::*;

/// Encode a bitmap as `mime` at a quality fraction in `[0, 1]`.
///
/// Out-of-range qualities are clamped. For PNG the quality only selects
/// compression effort; the output is always lossless.
///
/// # Errors
///
/// Returns an error for unsupported MIME types, zero-area bitmaps, or pixel
/// buffers that don't match the dimensions.
#[wasm_bindgen]
pub fn encode_image(image: &JsBitmap, mime: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let media_type = media_type(mime).map_err(|e| JsValue::from_str(&e))?;
    encode::encode(&image.to_bitmap(), media_type, Quality::new(quality))
        .map(|result| result.bytes().to_vec())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
