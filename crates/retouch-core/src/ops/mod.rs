//! Pixel-level image operations.
//!
//! The edit engine never touches pixels itself. It calls an [`ImageOps`]
//! implementation, one pure function per transform kind, plus a read-only
//! face probe. [`StandardOps`] is the implementation shipped with the crate,
//! built on the `image` and `imageproc` crates.
//!
//! # Conventions
//!
//! - Every function returns a new [`ImageBuffer`]; inputs are never modified.
//! - Results are deterministic for a given input and parameter set.
//! - Rotation angles are in degrees, positive = counter-clockwise.
//! - Coordinates are pixels, origin at the top-left corner.

mod blur;
mod draw;
mod edges;
mod font;
mod grayscale;
mod resize;
mod rotate;
mod tone;

use ab_glyph::FontArc;
use thiserror::Error;

use crate::buffer::{BufferError, ImageBuffer};
use crate::config::EditorConfig;
use crate::face::{probe_faces, FaceDetector, FaceScan};
use crate::operation::{Color, Point};

pub use blur::{gaussian_blur, gaussian_kernel};
pub use draw::{draw_circle, draw_line, draw_rect, draw_text, draw_text_with_font, load_font};
pub use edges::detect_edges;
pub use grayscale::{grayscale, to_gray};
pub use resize::{resize, FilterType};
pub use rotate::rotate;
pub use tone::{adjust_brightness_contrast, contrast_gain};

/// Errors raised by image operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpsError {
    /// An operation produced pixel data that does not fit its shape.
    #[error("Invalid output buffer: {0}")]
    Buffer(#[from] BufferError),

    /// Face probing was requested but no detector is installed.
    #[error("No face detector available")]
    FaceDetectorUnavailable,

    #[error("Font data could not be parsed")]
    InvalidFont,
}

/// The transform capability the edit engine delegates to.
///
/// Implementations must be pure: the same input and parameters always give
/// the same output, and the input buffer is never mutated. Parameters arrive
/// already validated by [`crate::EditOperation::validate`].
pub trait ImageOps {
    fn grayscale(&self, image: &ImageBuffer) -> Result<ImageBuffer, OpsError>;

    /// `kernel_size` is odd and at least 1.
    fn blur(&self, image: &ImageBuffer, kernel_size: u32) -> Result<ImageBuffer, OpsError>;

    /// Single-channel edge map. Threshold order is not significant.
    fn edge_detect(
        &self,
        image: &ImageBuffer,
        threshold1: f32,
        threshold2: f32,
    ) -> Result<ImageBuffer, OpsError>;

    /// Same-size canvas rotation about the image centre.
    fn rotate(&self, image: &ImageBuffer, angle: f64) -> Result<ImageBuffer, OpsError>;

    fn resize(&self, image: &ImageBuffer, width: u32, height: u32)
        -> Result<ImageBuffer, OpsError>;

    fn brightness_contrast(
        &self,
        image: &ImageBuffer,
        brightness: f64,
        contrast: f64,
    ) -> Result<ImageBuffer, OpsError>;

    fn draw_text(
        &self,
        image: &ImageBuffer,
        text: &str,
        origin: Point,
        font_scale: f64,
        color: Color,
    ) -> Result<ImageBuffer, OpsError>;

    fn draw_line(
        &self,
        image: &ImageBuffer,
        from: Point,
        to: Point,
        color: Color,
    ) -> Result<ImageBuffer, OpsError>;

    fn draw_rect(
        &self,
        image: &ImageBuffer,
        origin: Point,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<ImageBuffer, OpsError>;

    fn draw_circle(
        &self,
        image: &ImageBuffer,
        center: Point,
        radius: u32,
        color: Color,
    ) -> Result<ImageBuffer, OpsError>;

    /// Probe `image` for faces at each of `angles` (degrees).
    fn detect_faces(&self, image: &ImageBuffer, angles: &[f64]) -> Result<FaceScan, OpsError>;
}

/// Default [`ImageOps`] implementation.
pub struct StandardOps {
    stroke_thickness: u32,
    resize_filter: FilterType,
    face_detector: Option<Box<dyn FaceDetector>>,
    font: Option<FontArc>,
}

impl Default for StandardOps {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl std::fmt::Debug for StandardOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardOps")
            .field("stroke_thickness", &self.stroke_thickness)
            .field("resize_filter", &self.resize_filter)
            .field("face_detector", &self.face_detector.is_some())
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl StandardOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take stroke thickness and resize filter from `config`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            stroke_thickness: config.stroke_thickness.max(1),
            resize_filter: config.resize_filter,
            face_detector: None,
            font: None,
        }
    }

    /// Install the detector used by [`ImageOps::detect_faces`].
    pub fn with_face_detector(mut self, detector: impl FaceDetector + 'static) -> Self {
        self.face_detector = Some(Box::new(detector));
        self
    }

    /// Render text annotations with `font` instead of the bitmap glyphs.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn stroke_thickness(&self) -> u32 {
        self.stroke_thickness
    }

    pub fn resize_filter(&self) -> FilterType {
        self.resize_filter
    }

    pub fn has_face_detector(&self) -> bool {
        self.face_detector.is_some()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl ImageOps for StandardOps {
    fn grayscale(&self, image: &ImageBuffer) -> Result<ImageBuffer, OpsError> {
        grayscale(image)
    }

    fn blur(&self, image: &ImageBuffer, kernel_size: u32) -> Result<ImageBuffer, OpsError> {
        gaussian_blur(image, kernel_size)
    }

    fn edge_detect(
        &self,
        image: &ImageBuffer,
        threshold1: f32,
        threshold2: f32,
    ) -> Result<ImageBuffer, OpsError> {
        detect_edges(image, threshold1, threshold2)
    }

    fn rotate(&self, image: &ImageBuffer, angle: f64) -> Result<ImageBuffer, OpsError> {
        rotate(image, angle)
    }

    fn resize(
        &self,
        image: &ImageBuffer,
        width: u32,
        height: u32,
    ) -> Result<ImageBuffer, OpsError> {
        resize(image, width, height, self.resize_filter)
    }

    fn brightness_contrast(
        &self,
        image: &ImageBuffer,
        brightness: f64,
        contrast: f64,
    ) -> Result<ImageBuffer, OpsError> {
        adjust_brightness_contrast(image, brightness, contrast)
    }

    fn draw_text(
        &self,
        image: &ImageBuffer,
        text: &str,
        origin: Point,
        font_scale: f64,
        color: Color,
    ) -> Result<ImageBuffer, OpsError> {
        match &self.font {
            Some(font) => draw_text_with_font(image, text, origin, font_scale, color, font),
            None => draw_text(image, text, origin, font_scale, color),
        }
    }

    fn draw_line(
        &self,
        image: &ImageBuffer,
        from: Point,
        to: Point,
        color: Color,
    ) -> Result<ImageBuffer, OpsError> {
        draw_line(image, from, to, color, self.stroke_thickness)
    }

    fn draw_rect(
        &self,
        image: &ImageBuffer,
        origin: Point,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<ImageBuffer, OpsError> {
        draw_rect(image, origin, width, height, color, self.stroke_thickness)
    }

    fn draw_circle(
        &self,
        image: &ImageBuffer,
        center: Point,
        radius: u32,
        color: Color,
    ) -> Result<ImageBuffer, OpsError> {
        draw_circle(image, center, radius, color, self.stroke_thickness)
    }

    fn detect_faces(&self, image: &ImageBuffer, angles: &[f64]) -> Result<FaceScan, OpsError> {
        let detector = self
            .face_detector
            .as_deref()
            .ok_or(OpsError::FaceDetectorUnavailable)?;
        probe_faces(detector, image, angles)
    }
}
