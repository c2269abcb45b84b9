//! Watermark heuristics: region + translucency + brightness.
//!
//! Overlaid watermarks in this pipeline are semi-transparent white marks in
//! the bottom-right of the canvas. Two distinct predicates exist:
//!
//! - [`is_watermark_pixel`] is the strict quadrant rule (`alpha < 50`,
//!   bottom-right 1/4) used to exclude watermark pixels when computing
//!   subject bounds for the fit strategy.
//! - [`WatermarkParams`] drives the broader detection/removal region
//!   (right 35% x bottom 50%) where translucent bright pixels are counted
//!   or erased.
//!
//! Brightness filtering keeps dark subject shadows intact: only pixels whose
//! mean RGB exceeds the brightness threshold are treated as watermark.

use image::{DynamicImage, Rgba, RgbaImage};

/// Candidate counts above this trigger the checker's watermark flag.
pub const WATERMARK_PIXEL_LIMIT: usize = 20;

/// Parameters for the watermark detection/removal region and thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkParams {
    /// Upper alpha bound (exclusive); pixels at or above are solid content.
    pub alpha_threshold: u8,
    /// Lower mean-RGB bound (exclusive); pixels at or below are subject pixels.
    pub brightness_threshold: f32,
    /// Region starts at `x >= x_fraction * width`.
    pub x_fraction: f32,
    /// Region starts at `y >= y_fraction * height`.
    pub y_fraction: f32,
}

impl Default for WatermarkParams {
    fn default() -> Self {
        Self {
            alpha_threshold: 200,
            brightness_threshold: 250.0,
            x_fraction: 0.65,
            y_fraction: 0.50,
        }
    }
}

impl WatermarkParams {
    /// Top-left corner of the heuristic region for the given dimensions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    pub fn region_origin(&self, width: u32, height: u32) -> (u32, u32) {
        let x_start = (width as f32 * self.x_fraction) as u32;
        let y_start = (height as f32 * self.y_fraction) as u32;
        (x_start, y_start)
    }

    fn matches(&self, px: &Rgba<u8>) -> bool {
        let alpha = px[3];
        if alpha == 0 || alpha >= self.alpha_threshold {
            return false;
        }
        let brightness =
            (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0;
        brightness > self.brightness_threshold
    }
}

/// Strict quadrant predicate used for subject-bounds exclusion.
///
/// True iff the pixel is faint (`alpha < 50`) and lies in the bottom-right
/// quadrant (`x >= 0.75*width` and `y >= 0.75*height`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_watermark_pixel(x: u32, y: u32, alpha: u8, width: u32, height: u32) -> bool {
    if alpha >= 50 {
        return false;
    }
    let right_threshold = width as f32 * 0.75;
    let bottom_threshold = height as f32 * 0.75;
    x as f32 >= right_threshold && y as f32 >= bottom_threshold
}

/// Count watermark candidates inside the heuristic region.
///
/// A candidate is a translucent (`0 < alpha < alpha_threshold`) pixel whose
/// mean RGB brightness exceeds the brightness threshold.
#[must_use]
pub fn count_candidates(img: &RgbaImage, params: &WatermarkParams) -> usize {
    let (x_start, y_start) = params.region_origin(img.width(), img.height());
    img.enumerate_pixels()
        .filter(|&(x, y, px)| x >= x_start && y >= y_start && params.matches(px))
        .count()
}

/// Erase watermark pixels by rewriting them to fully transparent black.
///
/// Operates at the image's native resolution; pixels outside the region or
/// failing either the alpha or brightness condition are untouched.
#[must_use]
pub fn remove(img: &DynamicImage, params: &WatermarkParams) -> RgbaImage {
    let mut rgba = img.to_rgba8();
    let (x_start, y_start) = params.region_origin(rgba.width(), rgba.height());

    for (x, y, px) in rgba.enumerate_pixels_mut() {
        if x >= x_start && y >= y_start && params.matches(px) {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    rgba
}
