//! Annotation drawing on the canonical color frame.
//!
//! Visualization side effect only: outlines, center markers and Rf
//! labels never feed back into the returned spot values. Labels cover
//! digits and the decimal point; the glyphs are a fixed 5x7 raster so
//! the crate ships no font assets.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use tlc_spots_core::DetectedSpot;

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// Draw the rectangle outline, center marker and Rf label for one spot.
pub(crate) fn annotate_spot(canvas: &mut RgbImage, detected: &DetectedSpot) {
    let rect = detected.rect;
    draw_hollow_rect_mut(canvas, rect, OUTLINE_COLOR);
    if rect.width() > 2 && rect.height() > 2 {
        let inner = Rect::at(rect.left() + 1, rect.top() + 1)
            .of_size(rect.width() - 2, rect.height() - 2);
        draw_hollow_rect_mut(canvas, inner, OUTLINE_COLOR);
    }

    draw_filled_circle_mut(
        canvas,
        (detected.spot.x, detected.spot.y),
        1,
        CENTER_COLOR,
    );

    let label = format!("{:.3}", detected.spot.rf_value);
    draw_label(canvas, &label, &rect);
}

/// Draw `text` centered above the rectangle, dropping inside it when
/// there is no headroom.
fn draw_label(canvas: &mut RgbImage, text: &str, rect: &Rect) {
    let width = canvas.width() as i32;
    let text_w = text.chars().count() as i32 * GLYPH_ADVANCE - 1;

    let cx = rect.left() + rect.width() as i32 / 2;
    let x = (cx - text_w / 2).clamp(0, (width - text_w).max(0));
    let y = if rect.top() >= GLYPH_HEIGHT + 2 {
        rect.top() - GLYPH_HEIGHT - 2
    } else {
        rect.top() + 2
    };

    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            draw_glyph(canvas, rows, pen_x, y);
        }
        pen_x += GLYPH_ADVANCE;
    }
}

fn draw_glyph(canvas: &mut RgbImage, rows: [u8; 7], x: i32, y: i32) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits >> (GLYPH_WIDTH - 1 - col) & 1 == 0 {
                continue;
            }
            let (px, py) = (x + col, y + row as i32);
            if px >= 0 && px < w && py >= 0 && py < h {
                canvas.put_pixel(px as u32, py as u32, LABEL_COLOR);
            }
        }
    }
}

/// 5x7 raster glyphs; each byte is one row, bit 4 leftmost.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x04, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        _ => return None,
    };
    Some(rows)
}
