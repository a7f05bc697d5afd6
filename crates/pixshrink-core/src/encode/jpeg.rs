//! JPEG re-encoding.
//!
//! JPEG has no alpha channel, so translucent pixels are composited onto black
//! before encoding. That matches what a canvas produces when exporting a
//! transparent image as `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_bitmap, EncodeError};
use crate::decode::Bitmap;
use crate::Quality;

/// Map a quality fraction onto the encoder's 1-100 scale.
pub fn jpeg_quality(quality: Quality) -> u8 {
    quality.percent().clamp(1, 100)
}

/// Encode an RGBA bitmap to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 0.9-1.0: Near-lossless, output often larger than the source
/// * 0.7-0.9: Good quality, the default (0.8) sits here
/// * 0.4-0.7: Acceptable for web/social media
/// * Below 0.4: Visible block artifacts
pub fn encode_jpeg(bitmap: &Bitmap, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    validate_bitmap(bitmap)?;

    let rgb = flatten_onto_black(&bitmap.pixels);
    let mut buffer = Vec::new();

    JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
        .write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Drop the alpha channel, premultiplying each color onto a black background.
fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u16::from(px[3]);
        for &channel in &px[..3] {
            rgb.push(((u16::from(channel) * alpha + 127) / 255) as u8);
        }
    }
    rgb
}
