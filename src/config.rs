//! Layout configuration: the normalized canvas, safe area, and tolerances.
//!
//! All geometric decisions are made in a fixed 300x200 coordinate space. The
//! configuration is an immutable value passed explicitly into every component
//! so tests can substitute alternate geometries.

use crate::watermark::WatermarkParams;

/// Width of the normalized analysis canvas in pixels.
pub const CANVAS_WIDTH: u32 = 300;

/// Height of the normalized analysis canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 200;

/// The interior rectangle (normalized space) where all visible content must lie.
///
/// Coordinates are inclusive on all four edges: a pixel at `x == left` or
/// `x == right` is inside the safe area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SafeArea {
    /// Leftmost column inside the safe area.
    pub left: i32,
    /// Rightmost column inside the safe area.
    pub right: i32,
    /// Topmost row inside the safe area.
    pub top: i32,
    /// Bottommost row inside the safe area.
    pub bottom: i32,
}

impl SafeArea {
    /// Create a safe area, asserting the geometric invariants.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle is degenerate or falls outside the canvas.
    #[must_use]
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        assert!(0 <= left && left < right && right <= CANVAS_WIDTH as i32);
        assert!(0 <= top && top < bottom && bottom <= CANVAS_HEIGHT as i32);
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Horizontal extent, `right - left`.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent, `bottom - top`.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Integer center of the safe area (floor division).
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    /// Whether the given normalized coordinate lies inside the safe area.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

impl Default for SafeArea {
    fn default() -> Self {
        Self::new(14, 285, 24, 175)
    }
}

/// Immutable process-wide layout configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// The safe-area rectangle in normalized space.
    pub safe_area: SafeArea,
    /// Outward tolerance in normalized pixels: opaque pixels outside the safe
    /// area but within this band are warnings, beyond it errors.
    pub outer_tolerance: i32,
    /// Inward tolerance in normalized pixels used by the fill-ratio check.
    pub inner_tolerance: i32,
    /// Parameters for the watermark heuristic.
    pub watermark: WatermarkParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            safe_area: SafeArea::default(),
            outer_tolerance: 2,
            inner_tolerance: 4,
            watermark: WatermarkParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_safe_area_matches_layout_contract() {
        let sa = SafeArea::default();
        assert_eq!((sa.left, sa.right, sa.top, sa.bottom), (14, 285, 24, 175));
        assert_eq!(sa.width(), 271);
        assert_eq!(sa.height(), 151);
        assert_eq!(sa.center(), (149, 99));
    }

    #[test]
    fn contains_is_inclusive_on_all_edges() {
        let sa = SafeArea::default();
        assert!(sa.contains(14, 24));
        assert!(sa.contains(285, 175));
        assert!(!sa.contains(13, 100));
        assert!(!sa.contains(150, 176));
    }

    #[test]
    #[should_panic(expected = "left < right")]
    fn degenerate_safe_area_is_rejected() {
        let _ = SafeArea::new(100, 100, 24, 175);
    }

    #[test]
    fn default_tolerances() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.outer_tolerance, 2);
        assert_eq!(cfg.inner_tolerance, 4);
    }
}
