//! Image encoding for save and export.
//!
//! PNG and BMP store every layout as is. JPEG has no alpha channel, so RGBA
//! buffers are flattened to RGB (alpha dropped) before encoding.

use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{Channels, ImageBuffer};

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The file extension does not name a supported format.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The codec rejected the image.
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed {
        format: OutputFormat,
        reason: String,
    },
}

/// Container format for saved images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    /// Look up a format by file extension (case-insensitive, no dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" | "jpe" => Some(OutputFormat::Jpeg),
            "bmp" | "dib" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| EncodeError::UnsupportedFormat(extension.to_string()))
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Bmp => "image/bmp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

/// Encode `image` in `format`.
///
/// `quality` only applies to JPEG and is clamped to 1-100.
pub fn encode(
    image: &ImageBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    let mut buffer = Cursor::new(Vec::new());

    let failed = |e: image::ImageError| EncodeError::EncodingFailed {
        format,
        reason: e.to_string(),
    };

    match format {
        OutputFormat::Png => PngEncoder::new(&mut buffer)
            .write_image(image.pixels(), width, height, color_type(image.channels()))
            .map_err(failed)?,
        OutputFormat::Bmp => BmpEncoder::new(&mut buffer)
            .write_image(image.pixels(), width, height, color_type(image.channels()))
            .map_err(failed)?,
        OutputFormat::Jpeg => {
            let quality = quality.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            if image.channels() == Channels::Rgba {
                let flattened = image.to_dynamic().into_rgb8();
                encoder
                    .write_image(flattened.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(failed)?;
            } else {
                encoder
                    .write_image(image.pixels(), width, height, color_type(image.channels()))
                    .map_err(failed)?;
            }
        }
    }

    Ok(buffer.into_inner())
}

fn color_type(channels: Channels) -> ExtendedColorType {
    match channels {
        Channels::Gray => ExtendedColorType::L8,
        Channels::Rgb => ExtendedColorType::Rgb8,
        Channels::Rgba => ExtendedColorType::Rgba8,
    }
}
