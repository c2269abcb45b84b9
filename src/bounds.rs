//! Content-bounds detection over an RGBA bitmap.

use image::RgbaImage;

/// Alpha threshold above which a pixel counts as visible content.
pub const ALPHA_CONTENT: u8 = 10;

/// Alpha threshold above which a pixel counts as solid content (fill-ratio
/// and subject-bounds checks).
pub const ALPHA_SOLID: u8 = 200;

/// The tightest axis-aligned box containing all qualifying pixels.
///
/// When no pixel qualifies, `found` is `false` and the box is the full-canvas
/// sentinel `(0, 0, width-1, height-1)`. Callers must branch on `found`: a
/// full-canvas box is also a legitimate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    /// Leftmost qualifying column.
    pub min_x: i32,
    /// Topmost qualifying row.
    pub min_y: i32,
    /// Rightmost qualifying column.
    pub max_x: i32,
    /// Bottommost qualifying row.
    pub max_y: i32,
    /// Whether any pixel qualified.
    pub found: bool,
}

impl ContentBounds {
    /// Width of the box, inclusive of both edges.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Height of the box, inclusive of both edges.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    /// Integer center of the box (floor division).
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        ((self.min_x + self.max_x) / 2, (self.min_y + self.max_y) / 2)
    }
}

/// Scan every pixel and return the bounding box of content.
///
/// A pixel qualifies when its alpha exceeds `alpha_threshold` and, if an
/// exclusion predicate is supplied, the predicate returns `false` for
/// `(x, y, alpha)`. The scan is row-major, top to bottom.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn find_bounds(
    img: &RgbaImage,
    alpha_threshold: u8,
    exclude: Option<&dyn Fn(u32, u32, u8) -> bool>,
) -> ContentBounds {
    let (width, height) = img.dimensions();
    let mut min_x = width as i32;
    let mut min_y = height as i32;
    let mut max_x = 0_i32;
    let mut max_y = 0_i32;
    let mut found = false;

    for (x, y, px) in img.enumerate_pixels() {
        let alpha = px[3];
        if alpha <= alpha_threshold {
            continue;
        }
        if let Some(pred) = exclude {
            if pred(x, y, alpha) {
                continue;
            }
        }
        found = true;
        min_x = min_x.min(x as i32);
        min_y = min_y.min(y as i32);
        max_x = max_x.max(x as i32);
        max_y = max_y.max(y as i32);
    }

    if !found {
        return ContentBounds {
            min_x: 0,
            min_y: 0,
            max_x: width as i32 - 1,
            max_y: height as i32 - 1,
            found: false,
        };
    }

    ContentBounds {
        min_x,
        min_y,
        max_x,
        max_y,
        found: true,
    }
}
