//! Canny edge detection.

use image::GrayImage;

use crate::buffer::{Channels, ImageBuffer};

use super::grayscale::to_gray;
use super::OpsError;

/// Run Canny on the luma of `image` and return a single-channel edge map.
///
/// The smaller threshold is used for hysteresis linking and the larger one
/// for strong edges, whichever order they are passed in.
pub fn detect_edges(
    image: &ImageBuffer,
    threshold1: f32,
    threshold2: f32,
) -> Result<ImageBuffer, OpsError> {
    let gray = to_gray(image)?;
    let (width, height) = gray.dimensions();

    let low = threshold1.min(threshold2);
    let high = threshold1.max(threshold2);

    let input: GrayImage = gray.to_dynamic().into_luma8();
    let edges = imageproc::edges::canny(&input, low, high);

    Ok(ImageBuffer::new(
        width,
        height,
        Channels::Gray,
        edges.into_raw(),
    )?)
}
