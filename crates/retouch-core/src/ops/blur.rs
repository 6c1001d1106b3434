//! Separable Gaussian blur.
//!
//! # Kernel
//!
//! The kernel size is given by the caller; sigma is derived from it:
//!
//! ```text
//! sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8
//! ```
//!
//! Sizes 1, 3, 5 and 7 use the fixed binomial-like tables common in desktop
//! imaging libraries, so small kernels produce the same values users expect.
//!
//! # Borders
//!
//! Samples outside the image are mirrored without repeating the edge pixel
//! (`gfedcb|abcdefgh|gfedcba`).

use crate::buffer::ImageBuffer;

use super::OpsError;

const FIXED_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Normalised 1-D Gaussian weights for an odd `size`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = size.max(1) as usize;
    if size % 2 == 1 && size <= 7 {
        return FIXED_KERNELS[size / 2].to_vec();
    }

    let sigma = sigma_for(size as u32);
    let scale = -0.5 / (sigma * sigma);
    let center = (size as f64 - 1.0) / 2.0;

    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();

    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// How one axis of the blur samples its line.
#[derive(Debug, Clone, PartialEq)]
enum Taps {
    /// A single sample; every tap reflects onto it.
    Identity,
    /// Plain kernel taps, sampled through [`reflect_101`].
    Direct(Vec<f32>),
    /// Kernel weight summed per tap offset modulo the reflection period.
    Folded(Vec<f32>),
    /// Kernel so wide that each sample contributes in proportion to how
    /// often it occurs in one reflection period.
    Uniform,
}

/// Kernel sigma in reflection periods past which [`Taps::Uniform`] is exact
/// to well under one intensity level.
const UNIFORM_SIGMA_PERIODS: f64 = 4.0;

fn sigma_for(size: u32) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Choose the sampling for a line of `len` samples. Work per sample is
/// bounded by `len`, however large `kernel_size` is.
fn axis_taps(kernel_size: u32, len: usize) -> Taps {
    if len <= 1 {
        return Taps::Identity;
    }
    if kernel_size as usize <= len {
        return Taps::Direct(gaussian_kernel(kernel_size));
    }

    let period = 2 * (len - 1);
    if sigma_for(kernel_size) >= UNIFORM_SIGMA_PERIODS * period as f64 {
        return Taps::Uniform;
    }

    // sigma < 4 * period here, so the kernel spans fewer than ~27 periods.
    let kernel = gaussian_kernel(kernel_size);
    let radius = (kernel.len() / 2) as isize;
    let mut classes = vec![0.0f32; period];
    for (k, weight) in kernel.iter().enumerate() {
        classes[(k as isize - radius).rem_euclid(period as isize) as usize] += weight;
    }
    Taps::Folded(classes)
}

/// Convolve one line of interleaved samples into `out`.
fn convolve_line(line: &[f32], out: &mut [f32], stride: usize, taps: &Taps) {
    let len = line.len() / stride;
    out.iter_mut().for_each(|v| *v = 0.0);

    match taps {
        Taps::Identity => out.copy_from_slice(line),
        Taps::Direct(kernel) => {
            let radius = (kernel.len() / 2) as isize;
            for x in 0..len {
                let dst = x * stride;
                for (k, weight) in kernel.iter().enumerate() {
                    let s = reflect_101(x as isize + k as isize - radius, len) * stride;
                    for c in 0..stride {
                        out[dst + c] += line[s + c] * weight;
                    }
                }
            }
        }
        Taps::Folded(classes) => {
            let period = classes.len();
            for x in 0..len {
                let dst = x * stride;
                for s in 0..len {
                    // Offsets landing on `s` are those congruent to s - x,
                    // plus the mirrored -s - x for interior samples.
                    let mut weight = classes[(s + period - x) % period];
                    if s > 0 && s < len - 1 {
                        weight += classes[(2 * period - s - x) % period];
                    }
                    for c in 0..stride {
                        out[dst + c] += line[s * stride + c] * weight;
                    }
                }
            }
        }
        Taps::Uniform => {
            let period = (2 * (len - 1)) as f32;
            let mut mean = vec![0.0f32; stride];
            for s in 0..len {
                let weight = (if s == 0 || s == len - 1 { 1.0 } else { 2.0 }) / period;
                for c in 0..stride {
                    mean[c] += line[s * stride + c] * weight;
                }
            }
            for px in out.chunks_exact_mut(stride) {
                px.copy_from_slice(&mean);
            }
        }
    }
}

/// Blur every channel (alpha included) with a `kernel_size` square kernel.
///
/// `kernel_size` is expected to be odd; validation upstream guarantees it.
/// Kernels wider than the image are folded through the border reflection,
/// so the cost depends on the image size only.
pub fn gaussian_blur(image: &ImageBuffer, kernel_size: u32) -> Result<ImageBuffer, OpsError> {
    if kernel_size <= 1 {
        return Ok(image.clone());
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let stride = image.channels().count();
    let src = image.pixels();
    let row_len = width * stride;

    // Horizontal pass into f32 so the vertical pass doesn't compound rounding.
    let taps = axis_taps(kernel_size, width);
    let mut horizontal = vec![0.0f32; src.len()];
    let mut line = vec![0.0f32; row_len];
    for (src_row, dst_row) in src
        .chunks_exact(row_len)
        .zip(horizontal.chunks_exact_mut(row_len))
    {
        for (l, &v) in line.iter_mut().zip(src_row) {
            *l = v as f32;
        }
        convolve_line(&line, dst_row, stride, &taps);
    }

    let taps = axis_taps(kernel_size, height);
    let mut output = vec![0u8; src.len()];
    let mut column = vec![0.0f32; height * stride];
    let mut blurred = vec![0.0f32; height * stride];
    for x in 0..width {
        for y in 0..height {
            let s = (y * width + x) * stride;
            column[y * stride..(y + 1) * stride].copy_from_slice(&horizontal[s..s + stride]);
        }
        convolve_line(&column, &mut blurred, stride, &taps);
        for y in 0..height {
            let dst = (y * width + x) * stride;
            for c in 0..stride {
                output[dst + c] = blurred[y * stride + c].clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    Ok(ImageBuffer::new(
        image.width(),
        image.height(),
        image.channels(),
        output,
    )?)
}

/// Mirror an out-of-range index back into `0..len`, not repeating the edge.
#[inline]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = index.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}
