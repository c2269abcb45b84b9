//! Safe-area overlay rendering for presentation layers.

use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::config::SafeArea;

/// Semi-transparent red fill for the reserved border.
const BORDER_FILL: Rgba<u8> = Rgba([232, 115, 107, 120]);

/// Semi-transparent green for the safe-area boundary lines.
const BOUNDARY_LINE: Rgba<u8> = Rgba([0, 255, 0, 180]);

/// Boundary line width in normalized pixels.
const LINE_WIDTH: u32 = 2;

/// Draw the reserved-border fill and safe-area boundary lines over a
/// normalized 300x200 bitmap.
///
/// The input image is not modified; the overlay is alpha-composited onto a
/// copy.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn render(img: &RgbaImage, safe_area: &SafeArea) -> RgbaImage {
    let (width, height) = img.dimensions();
    let mut overlay = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    let left = safe_area.left as u32;
    let right = safe_area.right as u32;
    let top = safe_area.top as u32;
    let bottom = safe_area.bottom as u32;

    // Reserved border: four bands outside the safe area.
    if top > 0 {
        draw_filled_rect_mut(&mut overlay, rect(0, 0, width, top), BORDER_FILL);
    }
    if bottom + 1 < height {
        draw_filled_rect_mut(
            &mut overlay,
            rect(0, bottom + 1, width, height - bottom - 1),
            BORDER_FILL,
        );
    }
    if left > 0 {
        draw_filled_rect_mut(
            &mut overlay,
            rect(0, top, left, bottom - top + 1),
            BORDER_FILL,
        );
    }
    if right + 1 < width {
        draw_filled_rect_mut(
            &mut overlay,
            rect(right + 1, top, width - right - 1, bottom - top + 1),
            BORDER_FILL,
        );
    }

    // Boundary lines on the safe-area edges, drawn inward.
    let span_w = right - left + 1;
    let span_h = bottom - top + 1;
    draw_filled_rect_mut(&mut overlay, rect(left, top, span_w, LINE_WIDTH), BOUNDARY_LINE);
    draw_filled_rect_mut(
        &mut overlay,
        rect(left, bottom + 1 - LINE_WIDTH, span_w, LINE_WIDTH),
        BOUNDARY_LINE,
    );
    draw_filled_rect_mut(&mut overlay, rect(left, top, LINE_WIDTH, span_h), BOUNDARY_LINE);
    draw_filled_rect_mut(
        &mut overlay,
        rect(right + 1 - LINE_WIDTH, top, LINE_WIDTH, span_h),
        BOUNDARY_LINE,
    );

    let mut preview = img.clone();
    imageops::overlay(&mut preview, &overlay, 0, 0);
    preview
}

#[allow(clippy::cast_possible_wrap)]
fn rect(x: u32, y: u32, w: u32, h: u32) -> Rect {
    Rect::at(x as i32, y as i32).of_size(w, h)
}
