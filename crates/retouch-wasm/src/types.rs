//! WASM-compatible wrapper types for image data.

use retouch_core::{BufferError, Channels, ImageBuffer, OutputFormat};
use wasm_bindgen::prelude::*;

use crate::display::to_rgba;

/// An image handed to JavaScript.
///
/// Holds its own copy of the pixels; it is never affected by later edits.
/// Pixel accessors copy into a fresh `Uint8Array`.
#[wasm_bindgen]
pub struct JsImageBuffer {
    inner: ImageBuffer,
}

#[wasm_bindgen]
impl JsImageBuffer {
    /// Create an image from raw pixels.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - 1 (gray), 3 (RGB) or 4 (RGBA)
    /// * `pixels` - Row-major pixel data
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<JsImageBuffer, JsValue> {
        Self::try_new(width, height, channels, pixels)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Channel count: 1, 3 or 4.
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.channels().count() as u8
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_len()
    }

    /// Pixels in their stored layout.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Pixels as RGBA8, ready for `new ImageData(...)`.
    pub fn rgba(&self) -> Vec<u8> {
        to_rgba(&self.inner)
    }
}

impl JsImageBuffer {
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, BufferError> {
        let channels = Channels::try_from(channels)?;
        Ok(Self {
            inner: ImageBuffer::new(width, height, channels, pixels)?,
        })
    }

    pub(crate) fn as_buffer(&self) -> &ImageBuffer {
        &self.inner
    }
}

impl From<ImageBuffer> for JsImageBuffer {
    fn from(inner: ImageBuffer) -> Self {
        Self { inner }
    }
}

impl From<&ImageBuffer> for JsImageBuffer {
    fn from(image: &ImageBuffer) -> Self {
        Self {
            inner: image.clone(),
        }
    }
}

/// Parse an output format name ("png", "jpeg", "jpg", "bmp").
pub(crate) fn format_from_str(value: &str) -> Option<OutputFormat> {
    OutputFormat::from_extension(value.trim_start_matches('.'))
}

/// MIME type for a `save` format name, e.g. for a download `Blob`.
#[wasm_bindgen]
pub fn format_mime_type(format: &str) -> Option<String> {
    format_from_str(format).map(|f| f.mime_type().to_string())
}

/// Canonical file extension (no dot) for a `save` format name.
#[wasm_bindgen]
pub fn format_extension(format: &str) -> Option<String> {
    format_from_str(format).map(|f| f.extension().to_string())
}
