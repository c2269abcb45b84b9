//! Coordinate mapping between native resolution and the normalized canvas.
//!
//! Every geometric decision is computed in the fixed 300x200 analysis space
//! and then mapped back to the image's native resolution. The functions here
//! are pure arithmetic; no state is carried between calls.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Resize an image to the normalized 300x200 analysis canvas.
///
/// Returns the RGBA rendition plus a flag reporting whether a resize was
/// performed (`false` when the source is already exactly 300x200).
#[must_use]
pub fn to_normalized(img: &DynamicImage) -> (RgbaImage, bool) {
    if img.width() == CANVAS_WIDTH && img.height() == CANVAS_HEIGHT {
        (img.to_rgba8(), false)
    } else {
        let resized = imageops::resize(img, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3);
        (resized, true)
    }
}

/// Horizontal scale factor mapping `from` width into `to` width.
#[must_use]
pub fn scale_x(from_width: u32, to_width: u32) -> f64 {
    f64::from(to_width) / f64::from(from_width)
}

/// Vertical scale factor mapping `from` height into `to` height.
#[must_use]
pub fn scale_y(from_height: u32, to_height: u32) -> f64 {
    f64::from(to_height) / f64::from(from_height)
}

/// Scale a `(left, top, right, bottom)` box between two pixel spaces.
///
/// X and Y use independent scale factors; results are truncated toward zero,
/// so a forward/inverse round trip may drift by at most one pixel per edge.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn map_rect(
    rect: (u32, u32, u32, u32),
    from_size: (u32, u32),
    to_size: (u32, u32),
) -> (u32, u32, u32, u32) {
    let sx = scale_x(from_size.0, to_size.0);
    let sy = scale_y(from_size.1, to_size.1);
    let (l, t, r, b) = rect;
    (
        (f64::from(l) * sx) as u32,
        (f64::from(t) * sy) as u32,
        (f64::from(r) * sx) as u32,
        (f64::from(b) * sy) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn exact_size_input_is_not_resized() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            Rgba([10, 20, 30, 255]),
        ));
        let (norm, resized) = to_normalized(&img);
        assert!(!resized);
        assert_eq!(norm.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(norm.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn other_sizes_are_resized_to_canvas() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(600, 400, Rgba([0, 0, 0, 255])));
        let (norm, resized) = to_normalized(&img);
        assert!(resized);
        assert_eq!(norm.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn map_rect_scales_axes_independently() {
        let mapped = map_rect((10, 20, 150, 100), (300, 200), (600, 800));
        assert_eq!(mapped, (20, 80, 300, 400));
    }

    #[test]
    fn map_rect_truncates_toward_zero() {
        // 299 * 0.5 = 149.5 -> 149
        let mapped = map_rect((299, 199, 300, 200), (300, 200), (150, 100));
        assert_eq!(mapped, (149, 99, 150, 100));
    }

    #[test]
    fn map_rect_round_trip_is_within_one_pixel() {
        let rect = (13, 27, 287, 173);
        let fwd = map_rect(rect, (300, 200), (1170, 760));
        let back = map_rect(fwd, (1170, 760), (300, 200));
        let diffs = [
            i64::from(rect.0) - i64::from(back.0),
            i64::from(rect.1) - i64::from(back.1),
            i64::from(rect.2) - i64::from(back.2),
            i64::from(rect.3) - i64::from(back.3),
        ];
        for d in diffs {
            assert!(d.abs() <= 1, "round trip drifted by {d} pixels");
        }
    }
}
