//! Display adapter: any buffer layout to RGBA8 for a canvas `ImageData`.

use retouch_core::{Channels, ImageBuffer};

/// Expand `image` to tightly packed RGBA8.
///
/// Gray is replicated into the colour channels and RGB gets an opaque alpha.
pub fn to_rgba(image: &ImageBuffer) -> Vec<u8> {
    let pixels = image.pixels();
    match image.channels() {
        Channels::Rgba => pixels.to_vec(),
        Channels::Rgb => {
            let mut out = Vec::with_capacity(image.pixel_count() * 4);
            for px in pixels.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        }
        Channels::Gray => {
            let mut out = Vec::with_capacity(image.pixel_count() * 4);
            for &v in pixels {
                out.extend_from_slice(&[v, v, v, 255]);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let img = ImageBuffer::filled(2, 2, Channels::Rgb, &[1, 2, 3]).unwrap();
        assert_eq!(to_rgba(&img), [1, 2, 3, 255].repeat(4));
    }

    #[test]
    fn test_gray_is_replicated() {
        let img = ImageBuffer::new(2, 1, Channels::Gray, vec![10, 200]).unwrap();
        assert_eq!(to_rgba(&img), vec![10, 10, 10, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_rgba_is_copied() {
        let img = ImageBuffer::filled(3, 1, Channels::Rgba, &[9, 8, 7, 6]).unwrap();
        assert_eq!(to_rgba(&img), img.pixels());
    }

    #[test]
    fn test_length_is_four_per_pixel() {
        for channels in [Channels::Gray, Channels::Rgb, Channels::Rgba] {
            let value = vec![0u8; channels.count()];
            let img = ImageBuffer::filled(5, 3, channels, &value).unwrap();
            assert_eq!(to_rgba(&img).len(), 5 * 3 * 4);
        }
    }
}
