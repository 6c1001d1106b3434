//! Brightness / contrast adjustment.
//!
//! Formula: `output = clamp(round(input * (contrast / 127 + 1) + brightness))`
//!
//! Contrast 0 leaves the gain at 1, contrast 127 doubles every value and
//! contrast -127 maps everything to `brightness`.

use crate::buffer::ImageBuffer;
use crate::operation::CONTRAST_RANGE;

use super::OpsError;

/// Multiplicative gain for a contrast value.
#[inline]
pub fn contrast_gain(contrast: f64) -> f64 {
    contrast / CONTRAST_RANGE + 1.0
}

/// Apply the brightness/contrast formula to every colour channel.
///
/// Alpha is left untouched.
pub fn adjust_brightness_contrast(
    image: &ImageBuffer,
    brightness: f64,
    contrast: f64,
) -> Result<ImageBuffer, OpsError> {
    let gain = contrast_gain(contrast);

    // 256-entry lookup table: the formula only depends on the input value.
    let mut lut = [0u8; 256];
    for (value, out) in lut.iter_mut().enumerate() {
        *out = (value as f64 * gain + brightness).clamp(0.0, 255.0).round() as u8;
    }

    let channels = image.channels();
    let stride = channels.count();
    let colors = channels.color_count();

    let mut output = image.pixels().to_vec();
    for px in output.chunks_exact_mut(stride) {
        for v in &mut px[..colors] {
            *v = lut[*v as usize];
        }
    }

    Ok(ImageBuffer::new(
        image.width(),
        image.height(),
        channels,
        output,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Channels;

    fn gray_pixel(value: u8) -> ImageBuffer {
        ImageBuffer::filled(1, 1, Channels::Rgb, &[value, value, value]).unwrap()
    }

    fn first(image: &ImageBuffer) -> u8 {
        image.pixels()[0]
    }

    #[test]
    fn test_identity_parameters() {
        let pixels: Vec<u8> = (0..=255).flat_map(|v| [v, v, v]).collect();
        let img = ImageBuffer::new(256, 1, Channels::Rgb, pixels).unwrap();
        assert_eq!(adjust_brightness_contrast(&img, 0.0, 0.0).unwrap(), img);
    }

    #[test]
    fn test_brightness_only() {
        let result = adjust_brightness_contrast(&gray_pixel(100), 10.0, 0.0).unwrap();
        assert_eq!(first(&result), 110);
    }

    #[test]
    fn test_brightness_clamps_high() {
        let result = adjust_brightness_contrast(&gray_pixel(250), 10.0, 0.0).unwrap();
        assert_eq!(first(&result), 255);
    }

    #[test]
    fn test_brightness_clamps_low() {
        let result = adjust_brightness_contrast(&gray_pixel(5), -10.0, 0.0).unwrap();
        assert_eq!(first(&result), 0);
    }

    #[test]
    fn test_max_contrast_doubles() {
        let result = adjust_brightness_contrast(&gray_pixel(100), 0.0, 127.0).unwrap();
        assert_eq!(first(&result), 200);

        let result = adjust_brightness_contrast(&gray_pixel(200), 0.0, 127.0).unwrap();
        assert_eq!(first(&result), 255);
    }

    #[test]
    fn test_min_contrast_flattens() {
        let result = adjust_brightness_contrast(&gray_pixel(180), 40.0, -127.0).unwrap();
        assert_eq!(first(&result), 40);
    }

    #[test]
    fn test_alpha_untouched() {
        let img = ImageBuffer::filled(2, 1, Channels::Rgba, &[10, 20, 30, 77]).unwrap();
        let result = adjust_brightness_contrast(&img, 100.0, 0.0).unwrap();
        assert_eq!(result.pixel(0, 0), Some(&[110u8, 120, 130, 77][..]));
    }

    #[test]
    fn test_gray_layout() {
        let img = ImageBuffer::filled(2, 2, Channels::Gray, &[60]).unwrap();
        let result = adjust_brightness_contrast(&img, 5.0, 0.0).unwrap();
        assert_eq!(result.pixels(), &[65u8; 4][..]);
    }

    #[test]
    fn test_contrast_gain() {
        assert!((contrast_gain(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((contrast_gain(127.0) - 2.0).abs() < f64::EPSILON);
        assert!(contrast_gain(-127.0).abs() < f64::EPSILON);
    }
}
