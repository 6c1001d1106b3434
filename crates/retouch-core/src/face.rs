//! Face presence probing.
//!
//! The crate does not ship a detector model. Callers plug one in through
//! [`FaceDetector`]; [`probe_faces`] runs it over a grayscale copy of the
//! image at several rotation angles so tilted faces are still found.

use tracing::{debug, instrument};

use crate::buffer::ImageBuffer;
use crate::ops::{rotate, to_gray, OpsError};

/// Angles (degrees) probed when no other list is configured.
pub const DEFAULT_PROBE_ANGLES: [f64; 7] = [0.0, 15.0, -15.0, 30.0, -30.0, 45.0, -45.0];

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}

/// Outcome of a multi-angle face probe.
///
/// Bounds are in the coordinates of the rotated frame they were found in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceScan {
    faces: Vec<(f64, FaceBounds)>,
    angles_probed: usize,
}

impl FaceScan {
    /// Total number of detections over all probed angles.
    pub fn detections(&self) -> usize {
        self.faces.len()
    }

    /// Whether any angle produced a detection.
    pub fn found(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Every detection paired with the angle it was found at.
    pub fn faces(&self) -> &[(f64, FaceBounds)] {
        &self.faces
    }

    /// Distinct angles that produced at least one detection, in probe order.
    pub fn angles_with_faces(&self) -> Vec<f64> {
        let mut angles: Vec<f64> = Vec::new();
        for (angle, _) in &self.faces {
            if !angles.contains(angle) {
                angles.push(*angle);
            }
        }
        angles
    }

    pub fn angles_probed(&self) -> usize {
        self.angles_probed
    }
}

/// Run `detector` on a grayscale copy of `image` rotated by each angle.
///
/// Angle 0 probes the unrotated frame. Detections from every angle are
/// accumulated; the probe does not stop at the first hit.
#[instrument(skip(detector, image), fields(width = image.width(), height = image.height()))]
pub fn probe_faces(
    detector: &dyn FaceDetector,
    image: &ImageBuffer,
    angles: &[f64],
) -> Result<FaceScan, OpsError> {
    let gray = to_gray(image)?;
    let mut scan = FaceScan::default();

    for &angle in angles {
        let frame = if angle == 0.0 {
            gray.clone()
        } else {
            rotate(&gray, angle)?
        };

        let found = detector.detect(frame.pixels(), frame.width(), frame.height());
        debug!(angle, count = found.len(), "Probed angle");

        scan.faces.extend(found.into_iter().map(|face| (angle, face)));
        scan.angles_probed += 1;
    }

    Ok(scan)
}
