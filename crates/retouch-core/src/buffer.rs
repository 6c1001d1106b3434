//! Immutable pixel container used as the unit of edit history.
//!
//! An [`ImageBuffer`] never changes after construction. Every edit builds a
//! new buffer from an old one, so a snapshot stored in history can never be
//! affected by later edits.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when raw pixel data does not describe a valid buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimension { width: u32, height: u32 },

    /// Channel count other than 1, 3 or 4.
    #[error("Unsupported channel count: {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),

    /// Pixel data length doesn't match the declared shape.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Channel layout of an 8-bit buffer.
///
/// Colour layouts are stored in RGB(A) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channels {
    /// Single luma channel (edge maps, grayscale probes).
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl Channels {
    /// Number of bytes per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    /// Number of colour (non-alpha) channels.
    #[inline]
    pub fn color_count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb | Channels::Rgba => 3,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == Channels::Rgba
    }
}

impl TryFrom<u8> for Channels {
    type Error = BufferError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(BufferError::UnsupportedChannels(other)),
        }
    }
}

/// An image with 8 bits per channel, row-major, tightly packed.
///
/// `Clone` produces an independent deep copy of the pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer from raw pixel data, checking the shape invariant.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        pixels: Vec<u8>,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }

        let expected = expected_len(width, height, channels);
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Create a buffer filled with a single pixel value.
    ///
    /// `value` must hold exactly `channels.count()` bytes.
    pub fn filled(
        width: u32,
        height: u32,
        channels: Channels,
        value: &[u8],
    ) -> Result<Self, BufferError> {
        if value.len() != channels.count() {
            return Err(BufferError::LengthMismatch {
                expected: channels.count(),
                actual: value.len(),
            });
        }
        let count = (width as usize) * (height as usize);
        let pixels = value.repeat(count);
        Self::new(width, height, channels, pixels)
    }

    /// Build a buffer from a decoded `DynamicImage`.
    ///
    /// Images with an alpha channel become `Rgba`, single-channel images
    /// without alpha become `Gray`, everything else becomes `Rgb`.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, BufferError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(gray) => {
                Self::new(width, height, Channels::Gray, gray.into_raw())
            }
            other if other.color().has_alpha() => {
                Self::new(width, height, Channels::Rgba, other.into_rgba8().into_raw())
            }
            other => Self::new(width, height, Channels::Rgb, other.into_rgb8().into_raw()),
        }
    }

    /// Copy the pixels into a `DynamicImage` of the matching layout.
    pub fn to_dynamic(&self) -> DynamicImage {
        let pixels = self.pixels.clone();
        // Shape was validated at construction, so from_raw cannot fail here;
        // the fallbacks only keep this function total.
        match self.channels {
            Channels::Gray => image::GrayImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageLuma8)
                .unwrap_or_else(|| DynamicImage::new_luma8(self.width, self.height)),
            Channels::Rgb => image::RgbImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageRgb8)
                .unwrap_or_else(|| DynamicImage::new_rgb8(self.width, self.height)),
            Channels::Rgba => image::RgbaImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageRgba8)
                .unwrap_or_else(|| DynamicImage::new_rgba8(self.width, self.height)),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Read-only view of the pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels.count();
        let idx = ((y as usize) * (self.width as usize) + x as usize) * stride;
        Some(&self.pixels[idx..idx + stride])
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// Consume the buffer and return its pixel bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

fn expected_len(width: u32, height: u32, channels: Channels) -> usize {
    (width as usize) * (height as usize) * channels.count()
}
