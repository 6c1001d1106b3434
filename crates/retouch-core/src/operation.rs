//! Edit operations and their parameter contracts.
//!
//! An [`EditOperation`] names one transform and carries its parameters.
//! Operations are never stored; only the images they produce go into
//! history. [`EditOperation::validate`] checks parameters against each
//! operation's domain and applies the one documented normalisation
//! (even blur kernels are bumped to the next odd size).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::luminance::luma_u8;

/// Maximum absolute brightness shift.
pub const BRIGHTNESS_RANGE: f64 = 255.0;

/// Maximum absolute contrast value; `contrast / CONTRAST_RANGE + 1` is the gain.
pub const CONTRAST_RANGE: f64 = 127.0;

/// Upper bound for edge-detection thresholds.
pub const EDGE_THRESHOLD_MAX: f32 = 255.0;

/// A parameter outside its operation's domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid parameter for {operation}: {reason}")]
pub struct ParameterError {
    /// Operation kind (e.g. "resize").
    pub operation: &'static str,
    /// What was wrong with the value.
    pub reason: String,
}

impl ParameterError {
    fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

/// Pixel coordinate. May lie outside the image; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Annotation colour in the buffer's RGB ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Convert from BGR channel order.
    pub fn from_bgr(b: u8, g: u8, r: u8) -> Self {
        Self([r, g, b])
    }

    /// Value used when drawing this colour on a single-channel buffer.
    pub fn luma(self) -> u8 {
        let [r, g, b] = self.0;
        luma_u8(r, g, b)
    }
}

/// One destructive transform and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOperation {
    /// Convert to gray, keeping the channel layout.
    Grayscale,
    /// Gaussian blur with a square kernel.
    Blur { kernel_size: u32 },
    /// Canny edge map; produces a single-channel image.
    EdgeDetect { threshold1: f32, threshold2: f32 },
    /// Rotate about the centre by `angle` degrees counter-clockwise.
    Rotate { angle: f64 },
    /// Resize to exact dimensions.
    Resize { width: u32, height: u32 },
    /// `out = in * (contrast / 127 + 1) + brightness`.
    BrightnessContrast { brightness: f64, contrast: f64 },
    /// Text with its baseline-left corner at `origin`.
    DrawText {
        text: String,
        origin: Point,
        font_scale: f64,
        color: Color,
    },
    DrawLine { from: Point, to: Point, color: Color },
    /// Rectangle outline from `origin` to `origin + (width, height)`.
    DrawRect {
        origin: Point,
        width: u32,
        height: u32,
        color: Color,
    },
    DrawCircle {
        center: Point,
        radius: u32,
        color: Color,
    },
}

impl EditOperation {
    /// Short machine name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EditOperation::Grayscale => "grayscale",
            EditOperation::Blur { .. } => "blur",
            EditOperation::EdgeDetect { .. } => "edge_detect",
            EditOperation::Rotate { .. } => "rotate",
            EditOperation::Resize { .. } => "resize",
            EditOperation::BrightnessContrast { .. } => "brightness_contrast",
            EditOperation::DrawText { .. } => "draw_text",
            EditOperation::DrawLine { .. } => "draw_line",
            EditOperation::DrawRect { .. } => "draw_rect",
            EditOperation::DrawCircle { .. } => "draw_circle",
        }
    }

    /// Human-readable description, stored as the history label.
    pub fn label(&self) -> String {
        match self {
            EditOperation::Grayscale => "Grayscale".to_string(),
            EditOperation::Blur { kernel_size } => format!("Blur (kernel {})", kernel_size),
            EditOperation::EdgeDetect {
                threshold1,
                threshold2,
            } => format!("Edge detect ({}, {})", threshold1, threshold2),
            EditOperation::Rotate { angle } => format!("Rotate {}°", angle),
            EditOperation::Resize { width, height } => format!("Resize to {}x{}", width, height),
            EditOperation::BrightnessContrast {
                brightness,
                contrast,
            } => format!("Brightness {} / contrast {}", brightness, contrast),
            EditOperation::DrawText { text, .. } => format!("Text \"{}\"", text),
            EditOperation::DrawLine { .. } => "Line".to_string(),
            EditOperation::DrawRect { width, height, .. } => {
                format!("Rectangle {}x{}", width, height)
            }
            EditOperation::DrawCircle { radius, .. } => format!("Circle (radius {})", radius),
        }
    }

    /// Check parameters and return the normalised operation.
    ///
    /// Only the blur kernel is ever rewritten; every other out-of-domain
    /// value is rejected.
    pub fn validate(self) -> Result<Self, ParameterError> {
        let kind = self.kind();
        match self {
            EditOperation::Blur { kernel_size } => {
                if kernel_size == 0 {
                    return Err(ParameterError::new(kind, "kernel size must be at least 1"));
                }
                Ok(EditOperation::Blur {
                    kernel_size: normalize_kernel_size(kernel_size),
                })
            }
            EditOperation::EdgeDetect {
                threshold1,
                threshold2,
            } => {
                check_threshold(kind, "threshold1", threshold1)?;
                check_threshold(kind, "threshold2", threshold2)?;
                Ok(self)
            }
            EditOperation::Rotate { angle } => {
                if !angle.is_finite() {
                    return Err(ParameterError::new(kind, "angle must be a finite number"));
                }
                Ok(self)
            }
            EditOperation::Resize { width, height } => {
                if width == 0 || height == 0 {
                    return Err(ParameterError::new(
                        kind,
                        format!("target {}x{} must be at least 1x1", width, height),
                    ));
                }
                Ok(self)
            }
            EditOperation::BrightnessContrast {
                brightness,
                contrast,
            } => {
                check_range(kind, "brightness", brightness, BRIGHTNESS_RANGE)?;
                check_range(kind, "contrast", contrast, CONTRAST_RANGE)?;
                Ok(self)
            }
            EditOperation::DrawText { font_scale, .. } => {
                if !font_scale.is_finite() || font_scale <= 0.0 {
                    return Err(ParameterError::new(
                        kind,
                        format!("font scale {} must be positive", font_scale),
                    ));
                }
                Ok(self)
            }
            EditOperation::Grayscale
            | EditOperation::DrawLine { .. }
            | EditOperation::DrawRect { .. }
            | EditOperation::DrawCircle { .. } => Ok(self),
        }
    }
}

/// Round an even kernel size up to the next odd one.
#[inline]
pub fn normalize_kernel_size(kernel_size: u32) -> u32 {
    if kernel_size % 2 == 0 {
        kernel_size + 1
    } else {
        kernel_size
    }
}

fn check_threshold(kind: &'static str, name: &str, value: f32) -> Result<(), ParameterError> {
    if !value.is_finite() || !(0.0..=EDGE_THRESHOLD_MAX).contains(&value) {
        return Err(ParameterError::new(
            kind,
            format!("{} {} outside 0..={}", name, value, EDGE_THRESHOLD_MAX),
        ));
    }
    Ok(())
}

fn check_range(kind: &'static str, name: &str, value: f64, limit: f64) -> Result<(), ParameterError> {
    if !value.is_finite() || value.abs() > limit {
        return Err(ParameterError::new(
            kind,
            format!("{} {} outside -{}..={}", name, value, limit, limit),
        ));
    }
    Ok(())
}
