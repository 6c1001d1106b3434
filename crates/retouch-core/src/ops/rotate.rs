//! Same-canvas rotation with bilinear interpolation.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each pixel in the output image,
//! we calculate which source position maps onto it and interpolate the four
//! surrounding pixels. The canvas keeps its size, so corners of the rotated
//! content are clipped and uncovered areas are black (alpha 0 for RGBA).
//!
//! With `(cx, cy) = (width / 2, height / 2)` (integer division), `a = cos θ`
//! and `b = sin θ`, the inverse transform is:
//! ```text
//! src_x =  a * (dst_x - cx) - b * (dst_y - cy) + cx
//! src_y =  b * (dst_x - cx) + a * (dst_y - cy) + cy
//! ```
//! which turns content counter-clockwise on screen for positive θ.

use crate::buffer::ImageBuffer;

use super::OpsError;

/// Rotate `image` by `angle_degrees` about its centre, keeping its size.
pub fn rotate(image: &ImageBuffer, angle_degrees: f64) -> Result<ImageBuffer, OpsError> {
    // Fast path: whole turns are exact copies
    let normalized = angle_degrees % 360.0;
    if normalized.abs() < 1e-9 {
        return Ok(image.clone());
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let stride = image.channels().count();

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;

    let mut output = vec![0u8; image.byte_len()];
    let mut pixel = vec![0u8; stride];

    for dst_y in 0..height {
        let dy = dst_y as f64 - cy;
        for dst_x in 0..width {
            let dx = dst_x as f64 - cx;

            let src_x = cos * dx - sin * dy + cx;
            let src_y = sin * dx + cos * dy + cy;

            sample_bilinear(image, src_x, src_y, &mut pixel);

            let dst_idx = (dst_y * width + dst_x) * stride;
            output[dst_idx..dst_idx + stride].copy_from_slice(&pixel);
        }
    }

    Ok(ImageBuffer::new(
        image.width(),
        image.height(),
        image.channels(),
        output,
    )?)
}

/// Sample a pixel using bilinear interpolation.
///
/// Neighbours outside the image count as zero, so the content fades to black
/// over one pixel at the edges instead of being cut hard.
fn sample_bilinear(image: &ImageBuffer, x: f64, y: f64, out: &mut [u8]) {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64 {
        out.iter_mut().for_each(|v| *v = 0);
        return;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];

    let stride = out.len();
    let pixels = image.pixels();
    for (c, value) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for &(px, py, weight) in &taps {
            if weight == 0.0 || px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let idx = ((py * w + px) as usize) * stride + c;
            acc += pixels[idx] as f64 * weight;
        }
        *value = acc.clamp(0.0, 255.0).round() as u8;
    }
}
