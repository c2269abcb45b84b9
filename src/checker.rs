//! Compliance checking against the safe-area layout contract.
//!
//! The checker normalizes the bitmap to 300x200, classifies every opaque
//! pixel against the safe area with a two-band tolerance, verifies that solid
//! content fills enough of the safe area, applies the watermark heuristic,
//! and attaches a rendered preview. Violations are report entries, never
//! errors: only undecodable input fails a check.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::bounds::{self, ALPHA_CONTENT, ALPHA_SOLID};
use crate::config::{LayoutConfig, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::Result;
use crate::watermark::{self, WATERMARK_PIXEL_LIMIT};
use crate::{mapper, preview};

/// Maximum number of out-of-bounds sample coordinates kept in the report.
const MAX_SAMPLES: usize = 10;

/// Structured diagnostics accompanying a compliance verdict.
///
/// Fixed-shape record: every optional field is `None`/empty when the
/// corresponding check did not fire.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReportInfo {
    /// Container format of the input, when recognizable.
    pub format: Option<String>,
    /// Width of the input before normalization.
    pub original_width: u32,
    /// Height of the input before normalization.
    pub original_height: u32,
    /// Width after normalization (always 300).
    pub width: u32,
    /// Height after normalization (always 200).
    pub height: u32,
    /// Whether the input was resized to the normalized canvas.
    pub resized: bool,
    /// Number of opaque pixels beyond the outer tolerance.
    pub out_of_bounds_count: Option<usize>,
    /// Up to ten violating coordinates in row-major scan order.
    pub out_of_bounds_samples: Vec<(u32, u32)>,
    /// Number of opaque pixels outside the safe area but within tolerance.
    pub warning_pixel_count: Option<usize>,
    /// Whether solid content failed the fill-ratio check.
    pub too_small: bool,
    /// Solid-content dimensions, when solid content was found.
    pub content_size: Option<(i32, i32)>,
    /// Safe-area dimensions, for comparison against `content_size`.
    pub safe_area_size: (i32, i32),
    /// Whether the watermark heuristic fired.
    pub has_watermark: bool,
    /// Watermark candidate count, when candidates were found.
    pub watermark_pixel_count: Option<usize>,
    /// PNG-encoded preview with the safe-area overlay.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub preview_png: Vec<u8>,
}

/// The outcome of a single compliance check. Immutable once returned.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComplianceReport {
    /// Overall verdict; warnings alone never flip this to `false`.
    pub compliant: bool,
    /// Ordered violation messages.
    pub errors: Vec<String>,
    /// Ordered warning messages.
    pub warnings: Vec<String>,
    /// Structured diagnostics.
    pub info: ReportInfo,
}

/// Check a decoded image against the layout contract.
///
/// `format` is the container format of the original bytes, when known; it is
/// recorded in the report for diagnostics only.
///
/// # Errors
///
/// Returns an error only if the preview PNG fails to encode.
#[allow(clippy::cast_possible_wrap)]
pub fn check(
    img: &DynamicImage,
    format: Option<ImageFormat>,
    config: &LayoutConfig,
) -> Result<ComplianceReport> {
    let sa = &config.safe_area;
    let mut report = ComplianceReport {
        compliant: true,
        errors: Vec::new(),
        warnings: Vec::new(),
        info: ReportInfo {
            format: format.map(|f| format!("{f:?}").to_uppercase()),
            original_width: img.width(),
            original_height: img.height(),
            safe_area_size: (sa.width(), sa.height()),
            ..ReportInfo::default()
        },
    };

    let (norm, resized) = mapper::to_normalized(img);
    report.info.resized = resized;
    report.info.width = CANVAS_WIDTH;
    report.info.height = CANVAS_HEIGHT;
    if resized {
        report.warnings.push(format!(
            "original size is {}x{}, resized to {CANVAS_WIDTH}x{CANVAS_HEIGHT} for analysis",
            img.width(),
            img.height()
        ));
    }

    // Two-band pixel classification: outside the safe area but within the
    // outer tolerance is a warning, beyond it an error.
    let tol = config.outer_tolerance;
    let mut error_count = 0_usize;
    let mut warning_count = 0_usize;
    let mut samples: Vec<(u32, u32)> = Vec::new();
    for (x, y, px) in norm.enumerate_pixels() {
        if px[3] <= ALPHA_CONTENT {
            continue;
        }
        let (xi, yi) = (x as i32, y as i32);
        if sa.contains(xi, yi) {
            continue;
        }
        let beyond_tolerance = xi < sa.left - tol
            || xi > sa.right + tol
            || yi < sa.top - tol
            || yi > sa.bottom + tol;
        if beyond_tolerance {
            error_count += 1;
            if samples.len() < MAX_SAMPLES {
                samples.push((x, y));
            }
        } else {
            warning_count += 1;
        }
    }

    if error_count > 0 {
        report.compliant = false;
        report.errors.push(format!(
            "{error_count} pixel(s) overlap the reserved border outside the safe area"
        ));
        report.info.out_of_bounds_count = Some(error_count);
        report.info.out_of_bounds_samples = samples;
    }
    if warning_count > 0 {
        report.warnings.push(format!(
            "{warning_count} pixel(s) within {tol}px of the safe-area boundary"
        ));
        report.info.warning_pixel_count = Some(warning_count);
    }

    // Fill-ratio check on solid content: content passes unless it reaches
    // neither horizontal edge nor vertical edge within the inner tolerance.
    let solid = bounds::find_bounds(&norm, ALPHA_SOLID, None);
    if solid.found {
        let inner = config.inner_tolerance;
        let left_ok = solid.min_x <= sa.left + inner;
        let right_ok = solid.max_x >= sa.right - inner;
        let top_ok = solid.min_y <= sa.top + inner;
        let bottom_ok = solid.max_y >= sa.bottom - inner;
        let h_ok = left_ok || right_ok;
        let v_ok = top_ok || bottom_ok;
        if !h_ok && !v_ok {
            report.compliant = false;
            report.info.too_small = true;
            report.info.content_size = Some((solid.width(), solid.height()));
            report.errors.push(format!(
                "content {}x{} does not fill the {}x{} safe area on either axis",
                solid.width(),
                solid.height(),
                sa.width(),
                sa.height()
            ));
        } else {
            report.info.content_size = Some((solid.width(), solid.height()));
        }
    }

    // Watermark heuristic over the normalized bitmap.
    let candidates = watermark::count_candidates(&norm, &config.watermark);
    if candidates > 0 {
        report.info.watermark_pixel_count = Some(candidates);
    }
    if candidates > WATERMARK_PIXEL_LIMIT {
        report.compliant = false;
        report.info.has_watermark = true;
        report.errors.push(format!(
            "detected a semi-transparent watermark ({candidates} candidate pixels)"
        ));
    }

    // Preview with the safe-area overlay, attached as lossless PNG.
    let preview_img = preview::render(&norm, sa);
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(preview_img).write_to(&mut buf, ImageFormat::Png)?;
    report.info.preview_png = buf.into_inner();

    Ok(report)
}
