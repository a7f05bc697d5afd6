//! PNG re-encoding.
//!
//! PNG is lossless, so quality never touches pixels. It only picks how hard
//! deflate works: low quality asks for the smallest file, high quality for the
//! fastest encode.

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_bitmap, EncodeError};
use crate::decode::Bitmap;
use crate::Quality;

/// Deflate effort for a quality fraction.
pub fn png_compression(quality: Quality) -> CompressionType {
    match quality.fraction() {
        q if q < 0.34 => CompressionType::Best,
        q if q < 0.67 => CompressionType::Default,
        _ => CompressionType::Fast,
    }
}

/// Encode an RGBA bitmap to PNG bytes.
///
/// Fully opaque bitmaps are written as RGB to avoid storing a constant alpha
/// channel.
pub fn encode_png(bitmap: &Bitmap, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    validate_bitmap(bitmap)?;

    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, png_compression(quality), PngFilter::Adaptive);

    let result = if bitmap.has_transparency() {
        encoder.write_image(
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            ExtendedColorType::Rgba8,
        )
    } else {
        let rgb: Vec<u8> = bitmap
            .pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        encoder.write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
    };

    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::MediaType;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let bmp = Bitmap::filled(10, 10, [1, 2, 3, 255]);
        let png = encode_png(&bmp, Quality::default()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_compression_levels() {
        assert!(matches!(
            png_compression(Quality::from_percent(10)),
            CompressionType::Best
        ));
        assert!(matches!(
            png_compression(Quality::from_percent(50)),
            CompressionType::Default
        ));
        assert!(matches!(
            png_compression(Quality::from_percent(100)),
            CompressionType::Fast
        ));
    }

    #[test]
    fn test_png_is_lossless_at_any_quality() {
        let mut bmp = Bitmap::filled(8, 8, [40, 80, 120, 255]);
        bmp.pixels[3] = 0;
        bmp.pixels[4] = 250;

        for percent in [0, 50, 100] {
            let png = encode_png(&bmp, Quality::from_percent(percent)).unwrap();
            let decoded = decode(&png, MediaType::Png).unwrap();
            assert_eq!(decoded, bmp, "quality {percent} altered pixels");
        }
    }

    #[test]
    fn test_encode_png_zero_area() {
        let bmp = Bitmap {
            width: 5,
            height: 0,
            pixels: vec![],
        };
        assert!(encode_png(&bmp, Quality::default()).is_err());
    }
}
