//! Editor configuration.
//!
//! Everything is in memory; nothing is read from or written to disk. Hosts
//! deserialize an [`EditorConfig`] from whatever they have (a JS object in the
//! browser build) and missing fields fall back to the defaults below.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::face::DEFAULT_PROBE_ANGLES;
use crate::ops::FilterType;

/// Default JPEG quality used by `save`.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Default outline thickness for line, rectangle and circle annotations.
pub const DEFAULT_STROKE_THICKNESS: u32 = 2;

/// A configuration value outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("JPEG quality {0} outside 1..=100")]
    JpegQuality(u8),

    #[error("Stroke thickness must be at least 1")]
    ZeroStrokeThickness,

    #[error("Face probe angle list is empty")]
    NoProbeAngles,

    #[error("Face probe angle {0} is not finite")]
    NonFiniteProbeAngle(f64),
}

/// Options shared by the engine and the standard operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of history entries; `None` keeps everything.
    pub history_limit: Option<NonZeroUsize>,
    /// JPEG encoder quality (1-100).
    pub jpeg_quality: u8,
    /// Outline thickness in pixels for drawn shapes.
    pub stroke_thickness: u32,
    /// Interpolation used by resize.
    pub resize_filter: FilterType,
    /// Rotation angles (degrees) tried by face detection.
    pub face_probe_angles: Vec<f64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            stroke_thickness: DEFAULT_STROKE_THICKNESS,
            resize_filter: FilterType::default(),
            face_probe_angles: DEFAULT_PROBE_ANGLES.to_vec(),
        }
    }
}

impl EditorConfig {
    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        if self.stroke_thickness == 0 {
            return Err(ConfigError::ZeroStrokeThickness);
        }
        if self.face_probe_angles.is_empty() {
            return Err(ConfigError::NoProbeAngles);
        }
        if let Some(&angle) = self.face_probe_angles.iter().find(|a| !a.is_finite()) {
            return Err(ConfigError::NonFiniteProbeAngle(angle));
        }
        Ok(())
    }

    /// Builder-style history limit. `0` means unlimited.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = NonZeroUsize::new(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, None);
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.stroke_thickness, 2);
        assert_eq!(config.resize_filter, FilterType::Bilinear);
        assert_eq!(
            config.face_probe_angles,
            vec![0.0, 15.0, -15.0, 30.0, -30.0, 45.0, -45.0]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_quality() {
        let mut config = EditorConfig::default();
        config.jpeg_quality = 0;
        assert_eq!(config.validate(), Err(ConfigError::JpegQuality(0)));
        config.jpeg_quality = 101;
        assert_eq!(config.validate(), Err(ConfigError::JpegQuality(101)));
        config.jpeg_quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_thickness() {
        let mut config = EditorConfig::default();
        config.stroke_thickness = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStrokeThickness));
    }

    #[test]
    fn test_rejects_bad_angles() {
        let mut config = EditorConfig::default();
        config.face_probe_angles.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoProbeAngles));

        config.face_probe_angles = vec![0.0, f64::INFINITY];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteProbeAngle(a)) if a.is_infinite()
        ));
    }

    #[test]
    fn test_with_history_limit() {
        let config = EditorConfig::default().with_history_limit(3);
        assert_eq!(config.history_limit, NonZeroUsize::new(3));
        let config = config.with_history_limit(0);
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::JpegQuality(0).to_string(),
            "JPEG quality 0 outside 1..=100"
        );
    }
}
