//! Annotation drawing: text, lines, rectangles and circles.
//!
//! Drawing never mutates its input. The pixels are copied into a working
//! canvas, the shape is stroked with `imageproc`, and the result becomes a
//! new [`ImageBuffer`]. Coordinates may be anywhere in `i32`; geometry is
//! clipped to the canvas in 64-bit space before any pixel is touched.

use std::ops::RangeInclusive;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, Luma, Pixel, Rgb, Rgba};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_text_mut,
};
use imageproc::rect::Rect;

use crate::buffer::ImageBuffer;
use crate::operation::{Color, Point};

use super::font::{glyph, is_set, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::OpsError;

/// Font cell size in pixels at `font_scale` 1.0.
const TEXT_CELL_PX: f64 = 3.0;

/// Largest font cell, keeps glyph arithmetic inside `i32`.
const MAX_TEXT_CELL_PX: f64 = 4096.0;

/// Circles up to this radius, centred within [`MAX_MIDPOINT_CENTER`] of the
/// origin, go through imageproc's midpoint rasteriser. Anything larger is
/// scanned row by row over the canvas.
const MAX_MIDPOINT_RADIUS: i64 = 1 << 15;
const MAX_MIDPOINT_CENTER: i64 = 1 << 24;

#[derive(Debug, Clone, Copy)]
enum Shape<'a> {
    Line { from: Point, to: Point },
    Rect { origin: Point, width: u32, height: u32 },
    Circle { center: Point, radius: u32 },
    Text {
        text: &'a str,
        origin: Point,
        font_scale: f64,
        font: Option<&'a FontArc>,
    },
}

/// Stroke a line from `from` to `to`.
pub fn draw_line(
    image: &ImageBuffer,
    from: Point,
    to: Point,
    color: Color,
    thickness: u32,
) -> Result<ImageBuffer, OpsError> {
    render(image, Shape::Line { from, to }, color, thickness)
}

/// Stroke the outline of the rectangle spanning `origin` to
/// `origin + (width, height)`, both corners inclusive.
pub fn draw_rect(
    image: &ImageBuffer,
    origin: Point,
    width: u32,
    height: u32,
    color: Color,
    thickness: u32,
) -> Result<ImageBuffer, OpsError> {
    render(
        image,
        Shape::Rect {
            origin,
            width,
            height,
        },
        color,
        thickness,
    )
}

/// Stroke a circle outline.
pub fn draw_circle(
    image: &ImageBuffer,
    center: Point,
    radius: u32,
    color: Color,
    thickness: u32,
) -> Result<ImageBuffer, OpsError> {
    render(image, Shape::Circle { center, radius }, color, thickness)
}

/// Render `text` with the built-in bitmap font.
///
/// `origin` is the bottom-left corner of the first glyph. At scale 1.0 a
/// glyph is 21 pixels tall.
pub fn draw_text(
    image: &ImageBuffer,
    text: &str,
    origin: Point,
    font_scale: f64,
    color: Color,
) -> Result<ImageBuffer, OpsError> {
    render(
        image,
        Shape::Text {
            text,
            origin,
            font_scale,
            font: None,
        },
        color,
        1,
    )
}

/// Parse TrueType or OpenType font data.
pub fn load_font(data: Vec<u8>) -> Result<FontArc, OpsError> {
    FontArc::try_from_vec(data).map_err(|_| OpsError::InvalidFont)
}

/// Render `text` with an outline font, anti-aliased.
///
/// `origin` sits on the baseline at the start of the text. At scale 1.0 the
/// font is sized to the same 21 pixel height as the bitmap glyphs.
pub fn draw_text_with_font(
    image: &ImageBuffer,
    text: &str,
    origin: Point,
    font_scale: f64,
    color: Color,
    font: &FontArc,
) -> Result<ImageBuffer, OpsError> {
    render(
        image,
        Shape::Text {
            text,
            origin,
            font_scale,
            font: Some(font),
        },
        color,
        1,
    )
}

fn render(
    image: &ImageBuffer,
    shape: Shape<'_>,
    color: Color,
    thickness: u32,
) -> Result<ImageBuffer, OpsError> {
    let [r, g, b] = color.0;
    let thickness = thickness.max(1);

    let painted = match image.to_dynamic() {
        DynamicImage::ImageLuma8(mut canvas) => {
            paint(&mut canvas, shape, Luma([color.luma()]), thickness);
            DynamicImage::ImageLuma8(canvas)
        }
        DynamicImage::ImageRgba8(mut canvas) => {
            paint(&mut canvas, shape, Rgba([r, g, b, 255]), thickness);
            DynamicImage::ImageRgba8(canvas)
        }
        other => {
            let mut canvas = other.into_rgb8();
            paint(&mut canvas, shape, Rgb([r, g, b]), thickness);
            DynamicImage::ImageRgb8(canvas)
        }
    };

    Ok(ImageBuffer::from_dynamic(painted)?)
}

fn paint<P>(canvas: &mut image::ImageBuffer<P, Vec<u8>>, shape: Shape<'_>, color: P, thickness: u32)
where
    P: Pixel<Subpixel = u8>,
{
    match shape {
        Shape::Line { from, to } => paint_line(canvas, from, to, color, thickness),
        Shape::Rect {
            origin,
            width,
            height,
        } => paint_rect(canvas, origin, width, height, color, thickness),
        Shape::Circle { center, radius } => {
            paint_circle(canvas, center, radius, color, thickness)
        }
        Shape::Text {
            text,
            origin,
            font_scale,
            font,
        } => match font {
            Some(font) => paint_font_text(canvas, text, origin, font_scale, font, color),
            None => paint_text(canvas, text, origin, font_scale, color),
        },
    }
}

fn paint_line<P>(
    canvas: &mut image::ImageBuffer<P, Vec<u8>>,
    from: Point,
    to: Point,
    color: P,
    thickness: u32,
) where
    P: Pixel<Subpixel = u8>,
{
    let (x0, y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);
    let window = Window::around(canvas.width(), canvas.height());

    // Offset along the minor axis so thick strokes have no gaps.
    let horizontal = (x1 - x0).abs() >= (y1 - y0).abs();
    for k in stroke_offsets(thickness) {
        let (ox, oy) = if horizontal { (0, k as i64) } else { (k as i64, 0) };
        let start = ((x0 + ox) as f64, (y0 + oy) as f64);
        let end = ((x1 + ox) as f64, (y1 + oy) as f64);
        if let Some((start, end)) = window.clip_segment(start, end) {
            draw_line_segment_mut(canvas, start, end, color);
        }
    }
}

fn paint_rect<P>(
    canvas: &mut image::ImageBuffer<P, Vec<u8>>,
    origin: Point,
    width: u32,
    height: u32,
    color: P,
    thickness: u32,
) where
    P: Pixel<Subpixel = u8>,
{
    let window = Window::around(canvas.width(), canvas.height());
    for k in stroke_offsets(thickness) {
        let k = k as i64;
        let left = origin.x as i64 - k;
        let top = origin.y as i64 - k;
        let right = origin.x as i64 + width as i64 + k;
        let bottom = origin.y as i64 + height as i64 + k;
        if right < left || bottom < top {
            continue;
        }
        // Edges past the canvas collapse onto the window border, which
        // keeps every visible pixel of the outline where it was.
        let Some((left, top, right, bottom)) = window.clamp_box(left, top, right, bottom) else {
            continue;
        };
        let rect = Rect::at(left as i32, top as i32)
            .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn paint_circle<P>(
    canvas: &mut image::ImageBuffer<P, Vec<u8>>,
    center: Point,
    radius: u32,
    color: P,
    thickness: u32,
) where
    P: Pixel<Subpixel = u8>,
{
    let window = Window::around(canvas.width(), canvas.height());
    let (cx, cy) = (center.x as i64, center.y as i64);
    for k in stroke_offsets(thickness) {
        let r = radius as i64 + k as i64;
        if r < 0 || window.clamp_box(cx - r, cy - r, cx + r, cy + r).is_none() {
            continue;
        }
        let midpoint = r <= MAX_MIDPOINT_RADIUS && cx.abs().max(cy.abs()) <= MAX_MIDPOINT_CENTER;
        if midpoint {
            draw_hollow_circle_mut(canvas, (cx as i32, cy as i32), r as i32, color);
        } else {
            paint_ring(canvas, cx, cy, r, color);
        }
    }
}

/// Scanline ring for circles too large for the midpoint rasteriser: every
/// canvas pixel whose distance from the centre rounds to `r`.
fn paint_ring<P>(canvas: &mut image::ImageBuffer<P, Vec<u8>>, cx: i64, cy: i64, r: i64, color: P)
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let outer = r as f64 + 0.5;
    let inner = (r as f64 - 0.5).max(0.0);

    for y in (cy - r).max(0)..=(cy + r).min(height - 1) {
        let dy = (y - cy).abs() as f64;
        // (a - dy) * (a + dy) keeps precision when a and dy are both huge.
        let outer_dx = ((outer - dy).max(0.0) * (outer + dy)).sqrt();
        let inner_dx = ((inner - dy).max(0.0) * (inner + dy)).sqrt();
        let near = inner_dx.ceil() as i64;
        let far = outer_dx.ceil() as i64 - 1;
        if far < near {
            continue;
        }
        for (lo, hi) in [(cx - far, cx - near), (cx + near, cx + far)] {
            for x in lo.max(0)..=hi.min(width - 1) {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Canvas bounds grown by a one-pixel border on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    min: f64,
    max_x: f64,
    max_y: f64,
}

impl Window {
    fn around(width: u32, height: u32) -> Self {
        Self {
            min: -1.0,
            max_x: width as f64,
            max_y: height as f64,
        }
    }

    /// Clip an inclusive box to the window. `None` when nothing of its
    /// outline can reach the canvas.
    fn clamp_box(&self, left: i64, top: i64, right: i64, bottom: i64) -> Option<(i64, i64, i64, i64)> {
        let (min, max_x, max_y) = (self.min as i64, self.max_x as i64, self.max_y as i64);
        if right <= min || bottom <= min || left >= max_x || top >= max_y {
            return None;
        }
        Some((
            left.max(min),
            top.max(min),
            right.min(max_x),
            bottom.min(max_y),
        ))
    }

    /// Liang-Barsky clip of a segment, endpoints rounded back to whole
    /// pixels. Segments already inside come back unchanged.
    fn clip_segment(&self, start: (f64, f64), end: (f64, f64)) -> Option<((f32, f32), (f32, f32))> {
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);

        for (p, q) in [
            (-dx, start.0 - self.min),
            (dx, self.max_x - start.0),
            (-dy, start.1 - self.min),
            (dy, self.max_y - start.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return None;
                }
                t0 = t0.max(t);
            } else {
                if t < t0 {
                    return None;
                }
                t1 = t1.min(t);
            }
        }

        let at = |t: f64| {
            (
                (start.0 + t * dx).round() as f32,
                (start.1 + t * dy).round() as f32,
            )
        };
        Some((at(t0), at(t1)))
    }
}

fn paint_text<P>(
    canvas: &mut image::ImageBuffer<P, Vec<u8>>,
    text: &str,
    origin: Point,
    font_scale: f64,
    color: P,
) where
    P: Pixel<Subpixel = u8>,
{
    let cell = (font_scale * TEXT_CELL_PX)
        .round()
        .clamp(1.0, MAX_TEXT_CELL_PX) as i64;
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let top = origin.y as i64 - GLYPH_HEIGHT as i64 * cell;

    for (i, ch) in text.chars().enumerate() {
        let left = origin.x as i64 + i as i64 * GLYPH_ADVANCE as i64 * cell;
        if left >= width {
            break;
        }
        if left + GLYPH_WIDTH as i64 * cell <= 0 {
            continue;
        }

        let columns = glyph(ch);
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !is_set(&columns, col, row) {
                    continue;
                }
                let x = left + col as i64 * cell;
                let y = top + row as i64 * cell;
                if x >= width || y >= height || x + cell <= 0 || y + cell <= 0 {
                    continue;
                }
                let rect = Rect::at(x as i32, y as i32).of_size(cell as u32, cell as u32);
                draw_filled_rect_mut(canvas, rect, color);
            }
        }
    }
}

fn paint_font_text<P>(
    canvas: &mut image::ImageBuffer<P, Vec<u8>>,
    text: &str,
    origin: Point,
    font_scale: f64,
    font: &FontArc,
    color: P,
) where
    P: Pixel<Subpixel = u8>,
{
    let px = (font_scale * TEXT_CELL_PX).round().clamp(1.0, MAX_TEXT_CELL_PX)
        * GLYPH_HEIGHT as f64;
    let scale = PxScale::from(px as f32);
    let scaled = font.as_scaled(scale);
    let baseline = origin.y as i64;
    // imageproc positions text by the top of its ascent.
    let top = baseline - scaled.ascent().ceil() as i64;
    let reach = px.ceil() as i64;
    if top >= canvas.height() as i64 || baseline + reach <= 0 {
        return;
    }

    // Keep only the glyphs that can land on the canvas, so the pen position
    // handed to imageproc stays close to it.
    let width = canvas.width() as f64;
    let mut pen = origin.x as f64;
    let mut first = None;
    let mut end = text.len();
    for (i, ch) in text.char_indices() {
        if pen >= width {
            end = i;
            break;
        }
        let advance = scaled.h_advance(scaled.glyph_id(ch)) as f64;
        if first.is_none() && pen + advance + px >= 0.0 {
            first = Some((i, pen));
        }
        pen += advance;
    }
    let Some((first, x)) = first else {
        return;
    };

    draw_text_mut(
        canvas,
        color,
        x.floor() as i32,
        top as i32,
        scale,
        font,
        &text[first..end],
    );
}

/// Perpendicular offsets covering a stroke of `thickness` pixels.
fn stroke_offsets(thickness: u32) -> RangeInclusive<i32> {
    let t = thickness.clamp(1, 1024) as i32;
    let low = -((t - 1) / 2);
    low..=low + t - 1
}

#[cfg(test)]
pub(super) const TEST_FONT: &[u8] = include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Channels;

    fn black(width: u32, height: u32) -> ImageBuffer {
        ImageBuffer::filled(width, height, Channels::Rgb, &[0, 0, 0]).unwrap()
    }

    fn inked(image: &ImageBuffer) -> usize {
        image
            .pixels()
            .chunks_exact(image.channels().count())
            .filter(|px| px.iter().any(|&v| v != 0))
            .count()
    }

    const RED: Color = Color([255, 0, 0]);

    #[test]
    fn test_stroke_offsets() {
        assert_eq!(stroke_offsets(1), 0..=0);
        assert_eq!(stroke_offsets(2), 0..=1);
        assert_eq!(stroke_offsets(3), -1..=1);
        assert_eq!(stroke_offsets(0), 0..=0);
    }

    #[test]
    fn test_line_draws_new_buffer() {
        let img = black(20, 20);
        let result = draw_line(&img, Point::new(2, 10), Point::new(17, 10), RED, 1).unwrap();

        assert_eq!(inked(&img), 0, "input must not change");
        assert_eq!(result.pixel(10, 10), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(10, 11), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_thick_line() {
        let img = black(20, 20);
        let result = draw_line(&img, Point::new(2, 10), Point::new(17, 10), RED, 2).unwrap();
        assert_eq!(result.pixel(10, 10), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(10, 11), Some(&[255u8, 0, 0][..]));
    }

    #[test]
    fn test_line_past_edges_is_clipped() {
        let img = black(10, 10);
        let result =
            draw_line(&img, Point::new(-100, 5), Point::new(500, 5), RED, 1).unwrap();
        assert_eq!(result.dimensions(), (10, 10));
        assert_eq!(result.pixel(0, 5), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(9, 5), Some(&[255u8, 0, 0][..]));
    }

    #[test]
    fn test_rect_outline() {
        let img = black(20, 20);
        let result = draw_rect(&img, Point::new(5, 5), 10, 6, RED, 1).unwrap();
        assert_eq!(result.pixel(5, 5), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(15, 11), Some(&[255u8, 0, 0][..]));
        // Interior stays untouched.
        assert_eq!(result.pixel(10, 8), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_zero_size_rect() {
        let img = black(10, 10);
        let result = draw_rect(&img, Point::new(3, 3), 0, 0, RED, 1).unwrap();
        assert_eq!(result.pixel(3, 3), Some(&[255u8, 0, 0][..]));
    }

    #[test]
    fn test_circle_outline() {
        let img = black(40, 40);
        let result = draw_circle(&img, Point::new(20, 20), 10, RED, 2).unwrap();
        assert!(inked(&result) > 0);
        assert_eq!(result.pixel(20, 20), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_circle_off_canvas() {
        let img = black(10, 10);
        let result = draw_circle(&img, Point::new(-500, -500), 5, RED, 2).unwrap();
        assert_eq!(inked(&result), 0);
    }

    #[test]
    fn test_text_draws_above_origin() {
        let img = black(60, 30);
        let result = draw_text(&img, "Hi", Point::new(2, 25), 1.0, RED).unwrap();
        assert!(inked(&result) > 0);
        // Nothing below the baseline.
        for y in 25..30 {
            for x in 0..60 {
                assert_eq!(result.pixel(x, y), Some(&[0u8, 0, 0][..]));
            }
        }
    }

    #[test]
    fn test_empty_text_is_copy() {
        let img = black(10, 10);
        assert_eq!(draw_text(&img, "", Point::new(0, 9), 1.0, RED).unwrap(), img);
    }

    #[test]
    fn test_huge_text_scale_does_not_panic() {
        let img = black(10, 10);
        let result = draw_text(&img, "X", Point::new(0, 9), 1e12, RED).unwrap();
        assert_eq!(result.dimensions(), (10, 10));
    }

    #[test]
    fn test_line_from_far_left_is_clipped() {
        let img = black(10, 10);
        let result =
            draw_line(&img, Point::new(i32::MIN, 0), Point::new(5, 0), RED, 1).unwrap();
        for x in 0..=5 {
            assert_eq!(result.pixel(x, 0), Some(&[255u8, 0, 0][..]));
        }
        assert_eq!(result.pixel(6, 0), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_line_at_max_row_is_copy() {
        let img = black(10, 10);
        let result = draw_line(
            &img,
            Point::new(0, i32::MAX),
            Point::new(5, i32::MAX),
            RED,
            2,
        )
        .unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_line_spanning_i32_range() {
        let img = black(10, 10);
        let result = draw_line(
            &img,
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, i32::MAX),
            RED,
            3,
        )
        .unwrap();
        assert!(inked(&result) > 0);
    }

    #[test]
    fn test_rect_near_max_is_copy() {
        let img = black(10, 10);
        let result = draw_rect(&img, Point::new(i32::MAX - 10, 0), 100, 5, RED, 2).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_rect_wider_than_i32() {
        let img = black(10, 10);
        let result = draw_rect(&img, Point::new(2, 2), u32::MAX, 3, RED, 1).unwrap();
        // Top, bottom and left edges are visible; the right edge is far away.
        assert_eq!(result.pixel(9, 2), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(9, 5), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(2, 4), Some(&[255u8, 0, 0][..]));
        assert_eq!(result.pixel(9, 4), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_rect_around_canvas_is_copy() {
        let img = black(10, 10);
        let result = draw_rect(&img, Point::new(-5, -5), u32::MAX, u32::MAX, RED, 1).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_circle_near_max_is_copy() {
        let img = black(10, 10);
        let result = draw_circle(&img, Point::new(i32::MAX - 2, 3), 10, RED, 2).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_huge_circle_touching_canvas() {
        let img = black(10, 10);
        let result =
            draw_circle(&img, Point::new(5, 1_000_000_005), 1_000_000_000, RED, 1).unwrap();
        // Only the top of the circle crosses the canvas, as a flat row.
        for x in 0..10 {
            assert_eq!(result.pixel(x, 5), Some(&[255u8, 0, 0][..]));
        }
        assert_eq!(result.pixel(5, 4), Some(&[0u8, 0, 0][..]));
        assert_eq!(result.pixel(5, 6), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_max_radius_circle_at_extreme_center() {
        let img = black(10, 10);
        let result = draw_circle(&img, Point::new(i32::MIN, i32::MIN), u32::MAX, RED, 3).unwrap();
        assert_eq!(result.dimensions(), (10, 10));
    }

    #[test]
    fn test_ring_matches_midpoint_shape() {
        let img = black(40, 40);
        let mut ring = img.to_dynamic().into_rgb8();
        paint_ring(&mut ring, 20, 20, 10, Rgb([255, 0, 0]));
        let ring = ImageBuffer::from_dynamic(DynamicImage::ImageRgb8(ring)).unwrap();

        // Axis-aligned extremes of a radius-10 ring.
        for (x, y) in [(30, 20), (10, 20), (20, 30), (20, 10)] {
            assert_eq!(ring.pixel(x, y), Some(&[255u8, 0, 0][..]), "({}, {})", x, y);
        }
        assert_eq!(ring.pixel(20, 20), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let window = Window::around(10, 10);
        assert_eq!(
            window.clip_segment((1.0, 2.0), (8.0, 7.0)),
            Some(((1.0, 2.0), (8.0, 7.0)))
        );
        assert_eq!(window.clip_segment((20.0, 0.0), (30.0, 5.0)), None);
    }

    #[test]
    fn test_font_text_draws_above_baseline() {
        let font = load_font(TEST_FONT.to_vec()).unwrap();
        let img = black(80, 40);
        let result = draw_text_with_font(&img, "Hi", Point::new(2, 30), 1.0, RED, &font).unwrap();
        assert!(inked(&result) > 0);
        for x in 0..80 {
            assert_eq!(result.pixel(x, 39), Some(&[0u8, 0, 0][..]));
        }
    }

    #[test]
    fn test_font_text_far_away_is_copy() {
        let font = load_font(TEST_FONT.to_vec()).unwrap();
        let img = black(10, 10);
        for origin in [
            Point::new(i32::MAX, 5),
            Point::new(i32::MIN, 5),
            Point::new(0, i32::MIN),
            Point::new(0, i32::MAX),
        ] {
            let result = draw_text_with_font(&img, "Hello", origin, 1.0, RED, &font).unwrap();
            assert_eq!(result, img);
        }
    }

    #[test]
    fn test_long_font_text_from_far_left() {
        let font = load_font(TEST_FONT.to_vec()).unwrap();
        let img = black(40, 30);
        let text = "W".repeat(50_000);
        let result =
            draw_text_with_font(&img, &text, Point::new(-500_000, 25), 1.0, RED, &font).unwrap();
        assert!(inked(&result) > 0);
    }

    #[test]
    fn test_gray_canvas_uses_luma() {
        let img = ImageBuffer::filled(10, 10, Channels::Gray, &[0]).unwrap();
        let result = draw_line(&img, Point::new(0, 4), Point::new(9, 4), RED, 1).unwrap();
        assert_eq!(result.channels(), Channels::Gray);
        assert_eq!(result.pixel(5, 4), Some(&[76u8][..]));
    }

    #[test]
    fn test_rgba_canvas_is_opaque() {
        let img = ImageBuffer::filled(10, 10, Channels::Rgba, &[0, 0, 0, 0]).unwrap();
        let result = draw_line(&img, Point::new(0, 4), Point::new(9, 4), RED, 1).unwrap();
        assert_eq!(result.channels(), Channels::Rgba);
        assert_eq!(result.pixel(5, 4), Some(&[255u8, 0, 0, 255][..]));
    }
}
