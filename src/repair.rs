//! Geometric repair strategies: crop, pad, and fit.
//!
//! Every strategy makes its decision in the normalized 300x200 space, maps
//! the result back to the image's native resolution, and preserves the
//! original output dimensions. A fully transparent input degrades to the
//! full-canvas sentinel bounds and yields a no-op or centered placement.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::bounds::{self, ContentBounds, ALPHA_CONTENT, ALPHA_SOLID};
use crate::config::{LayoutConfig, SafeArea, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::Error;
use crate::{mapper, watermark};

/// Uniform-scale target width: safe-area width minus the inward margin.
const FIT_TARGET_WIDTH: i32 = 264;

/// Uniform-scale target height: safe-area height minus the inward margin.
const FIT_TARGET_HEIGHT: i32 = 144;

/// Content smaller than this fraction of the safe area on both axes is
/// considered under-filled by the fit strategy.
const FILL_FRACTION: f64 = 0.98;

/// The three corrective transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RepairStrategy {
    /// Crop around the content so it re-centers inside the safe area.
    SmartCrop,
    /// Push violating edges back inside by padding, then resize down.
    AddPadding,
    /// Center the subject and scale it uniformly to fill the safe area.
    SmartFit,
}

impl RepairStrategy {
    /// All strategies, in preference order.
    pub const ALL: [Self; 3] = [Self::SmartFit, Self::SmartCrop, Self::AddPadding];

    /// Wire name of the strategy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmartCrop => "smart_crop",
            Self::AddPadding => "add_padding",
            Self::SmartFit => "smart_fit",
        }
    }

    /// Human-readable description of what the strategy does.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::SmartCrop => "crop to the best content region and re-center",
            Self::AddPadding => "add margins around the image to push content inward",
            Self::SmartFit => "exclude the watermark, center and scale to the safe area",
        }
    }
}

impl fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepairStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.replace('-', "_").as_str() {
            "smart_crop" => Ok(Self::SmartCrop),
            "add_padding" => Ok(Self::AddPadding),
            "smart_fit" => Ok(Self::SmartFit),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Apply the named strategy to a decoded image.
///
/// The output has the same dimensions as the input.
#[must_use]
pub fn repair(img: &DynamicImage, strategy: RepairStrategy, config: &LayoutConfig) -> DynamicImage {
    match strategy {
        RepairStrategy::SmartCrop => smart_crop(img, config),
        RepairStrategy::AddPadding => add_padding(img, config),
        RepairStrategy::SmartFit => smart_fit(img, config),
    }
}

/// Crop rectangle in normalized space that re-centers content in the safe area.
///
/// Returns `(left, top, right, bottom)`.
#[allow(clippy::cast_sign_loss)]
fn compute_crop_rect(content: &ContentBounds, sa: &SafeArea) -> (u32, u32, u32, u32) {
    let (safe_cx, safe_cy) = sa.center();
    let (content_cx, content_cy) = content.center();
    let offset_x = safe_cx - content_cx;
    let offset_y = safe_cy - content_cy;

    let w = CANVAS_WIDTH as i32;
    let h = CANVAS_HEIGHT as i32;
    let left = 0.max(-offset_x) as u32;
    let top = 0.max(-offset_y) as u32;
    let right = w.min(w - offset_x) as u32;
    let bottom = h.min(h - offset_y) as u32;
    (left, top, right, bottom)
}

fn smart_crop(img: &DynamicImage, config: &LayoutConfig) -> DynamicImage {
    let (ow, oh) = (img.width(), img.height());
    let (norm, _) = mapper::to_normalized(img);
    let content = bounds::find_bounds(&norm, ALPHA_CONTENT, None);
    let sa = &config.safe_area;

    if content.min_x >= sa.left
        && content.max_x <= sa.right
        && content.min_y >= sa.top
        && content.max_y <= sa.bottom
    {
        return img.clone();
    }

    let crop_norm = compute_crop_rect(&content, sa);
    let (l, t, r, b) = mapper::map_rect(crop_norm, (CANVAS_WIDTH, CANVAS_HEIGHT), (ow, oh));
    let cropped = img.crop_imm(l, t, r - l, b - t);

    paste_centered(img.color().has_alpha(), &cropped, ow, oh)
}

fn paste_centered(has_alpha: bool, cropped: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let x = i64::from(width.saturating_sub(cropped.width()) / 2);
    let y = i64::from(height.saturating_sub(cropped.height()) / 2);

    if has_alpha {
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));
        imageops::replace(&mut canvas, &cropped.to_rgba8(), x, y);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        imageops::replace(&mut canvas, &cropped.to_rgb8(), x, y);
        DynamicImage::ImageRgb8(canvas)
    }
}

/// Per-side padding `(left, right, top, bottom)` in normalized units.
fn compute_padding(content: &ContentBounds, sa: &SafeArea) -> (i32, i32, i32, i32) {
    (
        0.max(sa.left - content.min_x),
        0.max(content.max_x - sa.right),
        0.max(sa.top - content.min_y),
        0.max(content.max_y - sa.bottom),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn add_padding(img: &DynamicImage, config: &LayoutConfig) -> DynamicImage {
    let (ow, oh) = (img.width(), img.height());
    let (norm, _) = mapper::to_normalized(img);
    let content = bounds::find_bounds(&norm, ALPHA_CONTENT, None);
    let (pad_l, pad_r, pad_t, pad_b) = compute_padding(&content, &config.safe_area);

    let sx = mapper::scale_x(CANVAS_WIDTH, ow);
    let sy = mapper::scale_y(CANVAS_HEIGHT, oh);
    let pad_l = (f64::from(pad_l) * sx) as u32;
    let pad_r = (f64::from(pad_r) * sx) as u32;
    let pad_t = (f64::from(pad_t) * sy) as u32;
    let pad_b = (f64::from(pad_b) * sy) as u32;

    if pad_l == 0 && pad_r == 0 && pad_t == 0 && pad_b == 0 {
        return img.clone();
    }

    let new_w = ow + pad_l + pad_r;
    let new_h = oh + pad_t + pad_b;
    let x = i64::from(pad_l);
    let y = i64::from(pad_t);

    // The final downscale intentionally ignores the aspect change introduced
    // by asymmetric padding; see the design notes.
    let padded = if img.color().has_alpha() {
        let mut canvas = RgbaImage::from_pixel(new_w, new_h, Rgba([255, 255, 255, 0]));
        imageops::replace(&mut canvas, &img.to_rgba8(), x, y);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = RgbImage::from_pixel(new_w, new_h, Rgb([255, 255, 255]));
        imageops::replace(&mut canvas, &img.to_rgb8(), x, y);
        DynamicImage::ImageRgb8(canvas)
    };

    padded.resize_exact(ow, oh, FilterType::Lanczos3)
}

/// Placement decision for the fit strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FitPlan {
    /// Normalized offset moving the subject center onto the safe-area center.
    offset_x: i32,
    offset_y: i32,
    /// Uniform scale factor; `1.0` means offset-only placement.
    scale: f64,
}

fn compute_fit(car: &ContentBounds, sa: &SafeArea) -> FitPlan {
    let (safe_cx, safe_cy) = sa.center();
    let (car_cx, car_cy) = car.center();
    let offset_x = safe_cx - car_cx;
    let offset_y = safe_cy - car_cy;

    let overflow = car.min_x + offset_x < sa.left
        || car.max_x + offset_x > sa.right
        || car.min_y + offset_y < sa.top
        || car.max_y + offset_y > sa.bottom;
    let too_small = f64::from(car.width()) < f64::from(sa.width()) * FILL_FRACTION
        && f64::from(car.height()) < f64::from(sa.height()) * FILL_FRACTION;

    let scale = if overflow || too_small {
        // The smaller factor guarantees the longer axis reaches the target
        // first without overshooting the other.
        let width_scale = f64::from(FIT_TARGET_WIDTH) / f64::from(car.width());
        let height_scale = f64::from(FIT_TARGET_HEIGHT) / f64::from(car.height());
        width_scale.min(height_scale)
    } else {
        1.0
    };

    FitPlan {
        offset_x,
        offset_y,
        scale,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn smart_fit(img: &DynamicImage, config: &LayoutConfig) -> DynamicImage {
    let (ow, oh) = (img.width(), img.height());
    let (norm, _) = mapper::to_normalized(img);
    let (nw, nh) = norm.dimensions();

    let exclude = move |x: u32, y: u32, alpha: u8| watermark::is_watermark_pixel(x, y, alpha, nw, nh);
    let car = bounds::find_bounds(&norm, ALPHA_SOLID, Some(&exclude));
    let sa = &config.safe_area;
    let plan = compute_fit(&car, sa);

    let sx = mapper::scale_x(CANVAS_WIDTH, ow);
    let sy = mapper::scale_y(CANVAS_HEIGHT, oh);
    let rgba = img.to_rgba8();
    let mut result = RgbaImage::from_pixel(ow, oh, Rgba([255, 255, 255, 0]));

    if (plan.scale - 1.0).abs() < f64::EPSILON {
        let x = (f64::from(plan.offset_x) * sx) as i64;
        let y = (f64::from(plan.offset_y) * sy) as i64;
        imageops::replace(&mut result, &rgba, x, y);
    } else {
        let new_w = ((f64::from(ow) * plan.scale) as u32).max(1);
        let new_h = ((f64::from(oh) * plan.scale) as u32).max(1);
        let scaled = imageops::resize(&rgba, new_w, new_h, FilterType::Lanczos3);

        let (safe_cx, safe_cy) = sa.center();
        let (car_cx, car_cy) = car.center();
        let x = (sx * (f64::from(safe_cx) - f64::from(car_cx) * plan.scale)) as i64;
        let y = (sy * (f64::from(safe_cy) - f64::from(car_cy) * plan.scale)) as i64;
        imageops::replace(&mut result, &scaled, x, y);
    }

    DynamicImage::ImageRgba8(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::find_bounds;

    fn solid_block(x0: u32, y0: u32, x1: u32, y1: u32) -> DynamicImage {
        let mut img = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 0]));
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, Rgba([60, 60, 60, 255]));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    fn content_at(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> ContentBounds {
        ContentBounds {
            min_x,
            min_y,
            max_x,
            max_y,
            found: true,
        }
    }

    #[test]
    fn crop_rect_recenters_corner_content() {
        // Content center (25,25), safe center (149,99): offset (124,74).
        let rect = compute_crop_rect(&content_at(0, 0, 50, 50), &SafeArea::default());
        assert_eq!(rect, (0, 0, 176, 126));
    }

    #[test]
    fn crop_rect_for_content_right_of_center() {
        // Content center (274,99): offset (-125, 0).
        let rect = compute_crop_rect(&content_at(249, 74, 299, 124), &SafeArea::default());
        assert_eq!(rect, (125, 0, 300, 200));
    }

    #[test]
    fn padding_pushes_each_violating_edge_back() {
        let pads = compute_padding(&content_at(5, 10, 290, 180), &SafeArea::default());
        assert_eq!(pads, (9, 5, 14, 5));
    }

    #[test]
    fn padding_is_zero_for_compliant_content() {
        let pads = compute_padding(&content_at(14, 24, 285, 175), &SafeArea::default());
        assert_eq!(pads, (0, 0, 0, 0));
    }

    #[test]
    fn fit_picks_the_smaller_scale_factor() {
        // 101x51 subject: width scale 264/101, height scale 144/51.
        let plan = compute_fit(&content_at(100, 100, 200, 150), &SafeArea::default());
        let expected = 264.0 / 101.0;
        assert!((plan.scale - expected).abs() < 1e-12);
        assert!(plan.scale < 144.0 / 51.0);
        assert_eq!((plan.offset_x, plan.offset_y), (-1, -26));
    }

    #[test]
    fn fit_is_offset_only_when_subject_already_fills() {
        let plan = compute_fit(&content_at(14, 24, 285, 175), &SafeArea::default());
        assert!((plan.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!((plan.offset_x, plan.offset_y), (0, 0));
    }

    #[test]
    fn fit_shrinks_overflowing_subject() {
        // 291 wide: overflows horizontally even after centering.
        let plan = compute_fit(&content_at(0, 50, 290, 150), &SafeArea::default());
        let expected = 264.0 / 291.0;
        assert!((plan.scale - expected).abs() < 1e-12);
    }

    #[test]
    fn strategy_names_round_trip() {
        for s in RepairStrategy::ALL {
            assert_eq!(s.as_str().parse::<RepairStrategy>().unwrap(), s);
        }
        assert_eq!(
            "smart-fit".parse::<RepairStrategy>().unwrap(),
            RepairStrategy::SmartFit
        );
        assert!("resize".parse::<RepairStrategy>().is_err());
    }

    #[test]
    fn smart_crop_leaves_compliant_image_unchanged() {
        let img = solid_block(14, 24, 285, 175);
        let out = repair(&img, RepairStrategy::SmartCrop, &LayoutConfig::default());
        assert_eq!(out.to_rgba8().as_raw(), img.to_rgba8().as_raw());
    }

    #[test]
    fn smart_crop_recenters_corner_content() {
        let img = solid_block(0, 0, 50, 50);
        let out = repair(&img, RepairStrategy::SmartCrop, &LayoutConfig::default());
        assert_eq!((out.width(), out.height()), (300, 200));

        let out = out.to_rgba8();
        // Crop (0,0,176,126) pasted centered lands the block at (62,37).
        assert_eq!(out.get_pixel(62, 37)[3], 255);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(150, 100)[3], 0);
    }

    #[test]
    fn add_padding_is_noop_for_compliant_content() {
        let img = solid_block(14, 24, 285, 175);
        let out = repair(&img, RepairStrategy::AddPadding, &LayoutConfig::default());
        assert_eq!(out.to_rgba8().as_raw(), img.to_rgba8().as_raw());
    }

    #[test]
    fn add_padding_moves_content_off_the_edge() {
        let img = solid_block(0, 100, 50, 120);
        let out = repair(&img, RepairStrategy::AddPadding, &LayoutConfig::default());
        assert_eq!((out.width(), out.height()), (300, 200));

        let content = find_bounds(&out.to_rgba8(), ALPHA_CONTENT, None);
        assert!(content.found);
        assert!(
            content.min_x > 5,
            "content should have moved inward, min_x={}",
            content.min_x
        );
    }

    #[test]
    fn smart_fit_scales_small_subject_into_the_safe_area() {
        let img = solid_block(100, 100, 200, 150);
        let out = repair(&img, RepairStrategy::SmartFit, &LayoutConfig::default());
        assert_eq!((out.width(), out.height()), (300, 200));

        let content = find_bounds(&out.to_rgba8(), ALPHA_CONTENT, None);
        let sa = SafeArea::default();
        let tol = LayoutConfig::default().outer_tolerance;
        assert!(content.found);
        // Lanczos resampling softens the edges; stay within the warning band.
        assert!(content.min_x >= sa.left - tol, "min_x={}", content.min_x);
        assert!(content.max_x <= sa.right + tol, "max_x={}", content.max_x);
        assert!(content.min_y >= sa.top - tol, "min_y={}", content.min_y);
        assert!(content.max_y <= sa.bottom + tol, "max_y={}", content.max_y);
        // Scaled up: the subject now spans most of the safe area.
        assert!(content.width() > 250);
    }

    #[test]
    fn smart_fit_ignores_the_corner_watermark() {
        let mut img = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 0]));
        for y in 100..=150 {
            for x in 100..=200 {
                img.put_pixel(x, y, Rgba([60, 60, 60, 255]));
            }
        }
        // Faint mark in the bottom-right quadrant; excluded from car bounds.
        for y in 190..200 {
            for x in 290..300 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 30]));
            }
        }
        let with_mark = DynamicImage::ImageRgba8(img);
        let clean = solid_block(100, 100, 200, 150);

        let out_marked = repair(&with_mark, RepairStrategy::SmartFit, &LayoutConfig::default());
        let out_clean = repair(&clean, RepairStrategy::SmartFit, &LayoutConfig::default());

        let solid_marked = find_bounds(&out_marked.to_rgba8(), ALPHA_SOLID, None);
        let solid_clean = find_bounds(&out_clean.to_rgba8(), ALPHA_SOLID, None);
        assert_eq!(
            (solid_marked.min_x, solid_marked.min_y),
            (solid_clean.min_x, solid_clean.min_y)
        );
    }

    #[test]
    fn fully_transparent_input_degrades_gracefully() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            Rgba([0, 0, 0, 0]),
        ));
        for strategy in RepairStrategy::ALL {
            let out = repair(&img, strategy, &LayoutConfig::default());
            assert_eq!((out.width(), out.height()), (300, 200));
        }
    }

    #[test]
    fn repair_preserves_native_resolution() {
        let mut img = RgbaImage::from_pixel(600, 400, Rgba([0, 0, 0, 0]));
        for y in 0..100 {
            for x in 0..100 {
                img.put_pixel(x, y, Rgba([60, 60, 60, 255]));
            }
        }
        let img = DynamicImage::ImageRgba8(img);
        for strategy in RepairStrategy::ALL {
            let out = repair(&img, strategy, &LayoutConfig::default());
            assert_eq!((out.width(), out.height()), (600, 400), "{strategy}");
        }
    }
}
