//! Image decoding for load.
//!
//! The container format is sniffed from the bytes (PNG, JPEG and BMP are
//! compiled in). EXIF orientation is applied so the buffer is upright.
//! Images with an alpha channel decode to RGBA, everything else to RGB.

mod orientation;

use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use crate::buffer::{BufferError, ImageBuffer};

pub use orientation::{apply_orientation, get_orientation, Orientation};

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded pixels do not form a valid buffer.
    #[error("Decoded image is unusable: {0}")]
    Buffer(#[from] BufferError),
}

/// Decode encoded image bytes into an upright buffer.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognised.
/// Returns `DecodeError::CorruptedFile` if the data is damaged or truncated.
pub fn decode_image(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let Some(format) = reader.format() else {
        return Err(DecodeError::InvalidFormat);
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = get_orientation(bytes);
    debug!(
        ?format,
        ?orientation,
        width = img.width(),
        height = img.height(),
        "Decoded image"
    );

    let img = apply_orientation(img, orientation);
    let img = if img.color().has_alpha() {
        image::DynamicImage::ImageRgba8(img.into_rgba8())
    } else {
        image::DynamicImage::ImageRgb8(img.into_rgb8())
    };

    Ok(ImageBuffer::from_dynamic(img)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Channels;
    use crate::encode::{encode, OutputFormat};

    fn png_bytes(channels: Channels, width: u32, height: u32) -> Vec<u8> {
        let value: Vec<u8> = [10u8, 20, 30, 40][..channels.count()].to_vec();
        let img = ImageBuffer::filled(width, height, channels, &value).unwrap();
        encode(&img, OutputFormat::Png, 95).unwrap()
    }

    #[test]
    fn test_decode_rgb_png() {
        let img = decode_image(&png_bytes(Channels::Rgb, 7, 3)).unwrap();
        assert_eq!(img.dimensions(), (7, 3));
        assert_eq!(img.channels(), Channels::Rgb);
        assert_eq!(img.pixel(6, 2), Some(&[10u8, 20, 30][..]));
    }

    #[test]
    fn test_decode_keeps_alpha() {
        let img = decode_image(&png_bytes(Channels::Rgba, 2, 2)).unwrap();
        assert_eq!(img.channels(), Channels::Rgba);
        assert_eq!(img.pixel(0, 0), Some(&[10u8, 20, 30, 40][..]));
    }

    #[test]
    fn test_decode_gray_becomes_rgb() {
        let img = decode_image(&png_bytes(Channels::Gray, 2, 2)).unwrap();
        assert_eq!(img.channels(), Channels::Rgb);
        assert_eq!(img.pixel(1, 1), Some(&[10u8, 10, 10][..]));
    }

    #[test]
    fn test_decode_jpeg() {
        let img = ImageBuffer::filled(8, 8, Channels::Rgb, &[128, 128, 128]).unwrap();
        let bytes = encode(&img, OutputFormat::Jpeg, 95).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.channels(), Channels::Rgb);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert_eq!(result, Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert_eq!(decode_image(&[]), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(Channels::Rgb, 16, 16);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }
}
