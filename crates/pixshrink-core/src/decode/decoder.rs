//! JPEG/PNG decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{Bitmap, DecodeError, Orientation};
use crate::MediaType;

/// Decode image bytes of the declared media type into an RGBA bitmap.
///
/// For JPEGs the EXIF orientation tag is honored, so the returned bitmap is
/// upright the way a browser would display it.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for zero-length input and
/// `DecodeError::CorruptedFile` if the bytes do not decode as `media_type`.
pub fn decode(bytes: &[u8], media_type: MediaType) -> Result<Bitmap, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let orientation = match media_type {
        MediaType::Jpeg => read_orientation(bytes),
        MediaType::Png => Orientation::Normal,
    };

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(media_type.image_format());

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let bitmap = Bitmap::from_rgba_image(oriented.into_rgba8());

    if bitmap.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    Ok(bitmap)
}

/// The EXIF orientation of a JPEG, or `Normal` when it has none.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Encoded test images built with the `image` crate.

    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    /// RGB gradient with some per-pixel noise so JPEG has detail to discard.
    pub fn photo_rgb(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let noise = ((x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 23) as u8;
                pixels.push(((x * 255) / width.max(1)) as u8 ^ noise);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push((((x + y) * 127) / (width + height).max(1)) as u8 ^ noise);
            }
        }
        pixels
    }

    pub fn jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .write_image(
                &photo_rgb(width, height),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
            .unwrap();
        out
    }

    /// A JPEG carrying an APP1 Exif segment with a single big-endian
    /// Orientation entry, inserted right after SOI.
    pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let [hi, lo] = orientation.to_be_bytes();
        #[rustfmt::skip]
        let app1: [u8; 36] = [
            0xFF, 0xE1, 0x00, 0x22,
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
            0x00, 0x01,
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, hi, lo, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        let plain = jpeg(width, height, 90);
        let mut out = Vec::with_capacity(plain.len() + app1.len());
        out.extend_from_slice(&plain[..2]);
        out.extend_from_slice(&app1);
        out.extend_from_slice(&plain[2..]);
        out
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                &photo_rgb(width, height),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
            .unwrap();
        out
    }
}
