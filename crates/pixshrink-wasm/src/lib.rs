//! pixshrink WASM - WebAssembly bindings for pixshrink
//!
//! This crate exposes the pixshrink-core compressor to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `compressor` - The `Compressor` class: controller, scheduling and page callbacks
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Low-level decode and resize bindings
//! - `encode` - Low-level encode binding
//!
//! # Usage
//!
//! ```typescript
//! import init, { Compressor, format_file_size } from '@pixshrink/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const compressor = new Compressor(callbacks);
//! console.log(format_file_size(1536)); // "1.50 KB"
//! ```

use pixshrink_core::{MediaType, ACCEPT_LIST, INVALID_FILE_MESSAGE};
use wasm_bindgen::prelude::*;

mod callbacks;
mod compressor;
mod decode;
mod encode;
mod logging;
mod presenter;
mod scheduler;
mod types;

// Re-export public types
pub use compressor::Compressor;
pub use decode::{decode_image, fit_dimensions, resize_to_fit};
pub use encode::encode_image;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Human-readable size: `"0 Bytes"`, `"512.00 Bytes"`, `"1.50 KB"`, `"2.00 MB"`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes as u64
    } else {
        0
    };
    pixshrink_core::format_file_size(bytes)
}

/// Whether a declared MIME type will be accepted.
#[wasm_bindgen]
pub fn is_supported_type(mime: &str) -> bool {
    mime.parse::<MediaType>().is_ok()
}

/// Value for a file input's `accept` attribute.
#[wasm_bindgen]
pub fn accept_list() -> String {
    ACCEPT_LIST.to_string()
}

/// The message shown when a file is rejected.
#[wasm_bindgen]
pub fn invalid_file_message() -> String {
    INVALID_FILE_MESSAGE.to_string()
}
