//! Decorative element rendering: height chart, border, divider line.
//!
//! All drawing is opaque painter's-algorithm work on the RGB canvas;
//! elements are drawn in declared order after every text element.

use ab_glyph::PxScale;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::compose::text::FontLibrary;
use crate::template::{DecorativeElement, FontWeight};

/// Vertical spacing between height-chart tick marks.
const TICK_SPACING: u32 = 50;
/// Tick marks get a numeric label at this interval.
const LABEL_SPACING: u32 = 100;
/// Horizontal length of a tick mark.
const TICK_LENGTH: u32 = 30;
const LABEL_SIZE: f32 = 12.0;

/// Draw all decorative elements onto the canvas in declared order.
pub fn draw_decorative_elements(
    canvas: &mut RgbImage,
    elements: &[DecorativeElement],
    fonts: &FontLibrary,
) {
    for element in elements {
        match element {
            DecorativeElement::HeightChart { position, height } => {
                draw_height_chart(canvas, *position, *height, fonts);
            }
            DecorativeElement::Border { width, color } => {
                draw_border(canvas, *width, Rgb(*color));
            }
            DecorativeElement::DividerLine {
                start,
                end,
                width,
                color,
            } => {
                draw_thick_line(canvas, *start, *end, *width, Rgb(*color));
            }
            DecorativeElement::Unknown => {
                debug!("skipping decorative element of unknown type");
            }
        }
    }
}

/// Height-ruler: a tick every 50 px for `height` px, with a label every
/// 100 px reading `offset / 10`, the booth's deliberately simplified,
/// non-metric scale.
fn draw_height_chart(canvas: &mut RgbImage, position: [i32; 2], height: u32, fonts: &FontLibrary) {
    let [x, y] = position;
    let black = Rgb([0, 0, 0]);

    for offset in (0..height).step_by(TICK_SPACING as usize) {
        // i64 keeps arbitrary document heights from overflowing; past the
        // bottom edge (plus the label overhang) nothing can paint, so stop.
        let mark_y = i64::from(y) + i64::from(offset);
        if mark_y > i64::from(canvas.height()) + 5 {
            break;
        }
        let mark_y = mark_y as i32;
        draw_filled_rect_mut(
            canvas,
            Rect::at(x, mark_y - 1).of_size(TICK_LENGTH + 1, 2),
            black,
        );

        if offset % LABEL_SPACING == 0 {
            let label = (offset / 10).to_string();
            if let Some(font) = fonts.resolve(FontWeight::Normal) {
                draw_text_mut(
                    canvas,
                    black,
                    x - 25,
                    mark_y - 5,
                    PxScale::from(LABEL_SIZE),
                    font,
                    &label,
                );
            } else {
                warn!(label, "skipping height chart label: no usable font");
            }
        }
    }
}

/// Full-perimeter stroke. The stroke is centered on the outermost pixel
/// rectangle, so roughly half the declared width falls inside the canvas
/// and the rest clips away, matching how the booth has always drawn it.
fn draw_border(canvas: &mut RgbImage, width: u32, color: Rgb<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let half = (width as i32) / 2;

    for i in 0..width as i32 {
        let inset = i - half;
        let rect_w = w - 2 * inset as i64;
        let rect_h = h - 2 * inset as i64;
        if rect_w <= 0 || rect_h <= 0 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at(inset, inset).of_size(rect_w as u32, rect_h as u32),
            color,
        );
    }
}

/// A straight line of the given stroke width, drawn as parallel 1 px
/// segments offset along the perpendicular.
fn draw_thick_line(
    canvas: &mut RgbImage,
    start: [i32; 2],
    end: [i32; 2],
    width: u32,
    color: Rgb<u8>,
) {
    let (sx, sy) = (start[0] as f32, start[1] as f32);
    let (ex, ey) = (end[0] as f32, end[1] as f32);

    if width <= 1 {
        draw_line_segment_mut(canvas, (sx, sy), (ex, ey), color);
        return;
    }

    let (dx, dy) = (ex - sx, ey - sy);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        // Degenerate line: a filled square of the stroke width.
        let half = (width / 2) as i32;
        draw_filled_rect_mut(
            canvas,
            Rect::at(start[0] - half, start[1] - half).of_size(width, width),
            color,
        );
        return;
    }

    let (nx, ny) = (-dy / len, dx / len);
    for i in 0..width {
        let t = i as f32 - (width as f32 - 1.0) / 2.0;
        draw_line_segment_mut(
            canvas,
            (sx + nx * t, sy + ny * t),
            (ex + nx * t, ey + ny * t),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn no_fonts() -> FontLibrary {
        FontLibrary::from_fonts(None, None)
    }

    #[test]
    fn border_paints_the_perimeter() {
        let mut canvas = blank(100, 80);
        draw_decorative_elements(
            &mut canvas,
            &[DecorativeElement::Border {
                width: 5,
                color: [0, 0, 0],
            }],
            &no_fonts(),
        );

        assert_eq!(canvas.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(99, 79), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(1, 40), &Rgb([0, 0, 0]));
        // Center stays untouched
        assert_eq!(canvas.get_pixel(50, 40), &Rgb([255, 255, 255]));
    }

    #[test]
    fn height_chart_draws_ticks_every_50() {
        let mut canvas = blank(200, 400);
        draw_decorative_elements(
            &mut canvas,
            &[DecorativeElement::HeightChart {
                position: [50, 100],
                height: 200,
            }],
            &no_fonts(),
        );

        // Ticks at y = 100, 150, 200, 250 (height 200 excludes 300)
        for tick_y in [100u32, 150, 200, 250] {
            assert_eq!(
                canvas.get_pixel(60, tick_y),
                &Rgb([0, 0, 0]),
                "expected tick at y={tick_y}"
            );
        }
        assert_eq!(canvas.get_pixel(60, 300), &Rgb([255, 255, 255]));
        // Ticks are 30 px long
        assert_eq!(canvas.get_pixel(95, 100), &Rgb([255, 255, 255]));
    }

    #[test]
    fn divider_line_connects_points() {
        let mut canvas = blank(100, 100);
        draw_decorative_elements(
            &mut canvas,
            &[DecorativeElement::DividerLine {
                start: [10, 50],
                end: [90, 50],
                width: 2,
                color: [150, 150, 150],
            }],
            &no_fonts(),
        );

        assert_eq!(canvas.get_pixel(50, 50), &Rgb([150, 150, 150]));
        assert_eq!(canvas.get_pixel(5, 50), &Rgb([255, 255, 255]));
    }

    #[test]
    fn unknown_element_is_ignored() {
        let mut canvas = blank(50, 50);
        let before = canvas.clone();
        draw_decorative_elements(&mut canvas, &[DecorativeElement::Unknown], &no_fonts());
        assert_eq!(canvas, before);
    }

    #[test]
    fn height_chart_with_huge_height_terminates() {
        // A parseable document can declare any u32 height; drawing must
        // stop at the canvas bottom instead of panicking or spinning.
        let mut huge = blank(100, 160);
        draw_decorative_elements(
            &mut huge,
            &[DecorativeElement::HeightChart {
                position: [40, 20],
                height: u32::MAX,
            }],
            &no_fonts(),
        );

        // Visible output matches a chart that merely overruns the bottom.
        let mut overrun = blank(100, 160);
        draw_decorative_elements(
            &mut overrun,
            &[DecorativeElement::HeightChart {
                position: [40, 20],
                height: 300,
            }],
            &no_fonts(),
        );
        assert_eq!(huge, overrun);
        assert_eq!(huge.get_pixel(50, 20), &Rgb([0, 0, 0]));
        assert_eq!(huge.get_pixel(50, 120), &Rgb([0, 0, 0]));
    }

    #[test]
    fn elements_clip_at_canvas_edges() {
        // A chart anchored near the bottom edge must not panic.
        let mut canvas = blank(100, 120);
        draw_decorative_elements(
            &mut canvas,
            &[DecorativeElement::HeightChart {
                position: [80, 100],
                height: 300,
            }],
            &no_fonts(),
        );
        assert_eq!(canvas.dimensions(), (100, 120));
    }
}
