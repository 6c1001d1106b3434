//! Grayscale conversion.

use crate::buffer::{Channels, ImageBuffer};
use crate::luminance::luma_u8;

use super::OpsError;

/// Replace every colour pixel with its BT.601 luma, keeping the layout.
///
/// RGB input stays three-channel so later colour edits (annotations in
/// particular) still work; RGBA keeps its alpha; gray input is copied.
pub fn grayscale(image: &ImageBuffer) -> Result<ImageBuffer, OpsError> {
    let channels = image.channels();
    if channels == Channels::Gray {
        return Ok(image.clone());
    }

    let stride = channels.count();
    let mut output = Vec::with_capacity(image.byte_len());
    for px in image.pixels().chunks_exact(stride) {
        let y = luma_u8(px[0], px[1], px[2]);
        output.extend_from_slice(&[y, y, y]);
        if channels.has_alpha() {
            output.push(px[3]);
        }
    }

    Ok(ImageBuffer::new(image.width(), image.height(), channels, output)?)
}

/// Collapse any layout to a single luma channel.
///
/// Alpha is ignored. Used as the input of edge detection and face probing.
pub fn to_gray(image: &ImageBuffer) -> Result<ImageBuffer, OpsError> {
    let channels = image.channels();
    if channels == Channels::Gray {
        return Ok(image.clone());
    }

    let output: Vec<u8> = image
        .pixels()
        .chunks_exact(channels.count())
        .map(|px| luma_u8(px[0], px[1], px[2]))
        .collect();

    Ok(ImageBuffer::new(
        image.width(),
        image.height(),
        Channels::Gray,
        output,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_rgb_stays_three_channel() {
        let img = ImageBuffer::filled(4, 4, Channels::Rgb, &[255, 0, 0]).unwrap();
        let result = grayscale(&img).unwrap();

        assert_eq!(result.channels(), Channels::Rgb);
        assert_eq!(result.dimensions(), (4, 4));
        assert_eq!(result.pixel(0, 0), Some(&[76u8, 76, 76][..]));
    }

    #[test]
    fn test_grayscale_rgba_keeps_alpha() {
        let img = ImageBuffer::filled(2, 2, Channels::Rgba, &[0, 255, 0, 40]).unwrap();
        let result = grayscale(&img).unwrap();

        assert_eq!(result.channels(), Channels::Rgba);
        assert_eq!(result.pixel(1, 1), Some(&[150u8, 150, 150, 40][..]));
    }

    #[test]
    fn test_grayscale_gray_is_copy() {
        let img = ImageBuffer::filled(3, 3, Channels::Gray, &[99]).unwrap();
        let result = grayscale(&img).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let pixels: Vec<u8> = (0..(5 * 5 * 3)).map(|i| (i * 7 % 256) as u8).collect();
        let img = ImageBuffer::new(5, 5, Channels::Rgb, pixels).unwrap();
        let once = grayscale(&img).unwrap();
        let twice = grayscale(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_to_gray_single_channel() {
        let img = ImageBuffer::filled(3, 2, Channels::Rgba, &[0, 0, 255, 0]).unwrap();
        let gray = to_gray(&img).unwrap();
        assert_eq!(gray.channels(), Channels::Gray);
        assert_eq!(gray.pixels(), &[29u8; 6][..]);
    }
}
