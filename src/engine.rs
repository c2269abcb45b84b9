//! Byte-level façade and file processing.
//!
//! [`LayoutEngine`] wraps the checker and repair strategies behind the four
//! byte-oriented operations (check, repair, watermark removal, preview) and
//! adds file/directory helpers for the CLI. Repaired output is always
//! re-encoded as lossless PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::checker::ComplianceReport;
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::repair::RepairStrategy;
use crate::watermark::{self, WATERMARK_PIXEL_LIMIT};
use crate::{checker, mapper, preview, repair};

/// Options controlling file processing behavior.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Strategy applied to non-compliant images.
    pub strategy: RepairStrategy,
    /// Repair even when the image is already compliant.
    pub force: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable verbose logging.
    pub verbose: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            strategy: RepairStrategy::SmartFit,
            force: false,
            quiet: false,
            verbose: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (already compliant).
    pub skipped: bool,
    /// Compliance verdict before repair, when the check ran.
    pub compliant_before: Option<bool>,
    /// Human-readable status message.
    pub message: String,
}

/// The compliance engine holding the immutable layout configuration.
///
/// Create once and reuse across images; every operation is a pure function
/// of its input bytes.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the standard 300x200 layout contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an alternate geometry.
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The layout configuration in effect.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Decode `bytes` and check them against the layout contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are not a readable image.
    pub fn check(&self, bytes: &[u8]) -> Result<ComplianceReport> {
        let format = image::guess_format(bytes).ok();
        let img = decode(bytes)?;
        checker::check(&img, format, &self.config)
    }

    /// Decode, repair with the given strategy, and re-encode as PNG.
    ///
    /// The watermark is removed first only when the checker heuristic flags
    /// one on the normalized bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unreadable input or an encode error.
    pub fn repair(&self, bytes: &[u8], strategy: RepairStrategy) -> Result<Vec<u8>> {
        let img = decode(bytes)?;

        let (norm, _) = mapper::to_normalized(&img);
        let img = if watermark::count_candidates(&norm, &self.config.watermark)
            > WATERMARK_PIXEL_LIMIT
        {
            DynamicImage::ImageRgba8(watermark::remove(&img, &self.config.watermark))
        } else {
            img
        };

        let repaired = repair::repair(&img, strategy, &self.config);
        encode_png(&repaired)
    }

    /// Decode, erase watermark pixels, and re-encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unreadable input or an encode error.
    pub fn remove_watermark(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let img = decode(bytes)?;
        let cleaned = watermark::remove(&img, &self.config.watermark);
        encode_png(&DynamicImage::ImageRgba8(cleaned))
    }

    /// Draw the safe-area overlay on a normalized 300x200 bitmap.
    #[must_use]
    pub fn render_preview(&self, img: &RgbaImage) -> RgbaImage {
        preview::render(img, &self.config.safe_area)
    }

    /// Process a single image file: load, check, repair if needed, save.
    ///
    /// Compliant images are skipped unless `opts.force` is set. Failures are
    /// reported per file and never panic.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            skipped: false,
            compliant_before: None,
            message: String::new(),
        };

        let bytes = match std::fs::read(input) {
            Ok(b) => b,
            Err(e) => {
                result.message = format!("failed to read: {e}");
                return result;
            }
        };

        let report = match self.check(&bytes) {
            Ok(r) => r,
            Err(e) => {
                result.message = format!("failed to check: {e}");
                return result;
            }
        };
        result.compliant_before = Some(report.compliant);

        if report.compliant && !opts.force {
            result.skipped = true;
            result.success = true;
            result.message = "already compliant".to_string();
            return result;
        }

        let repaired = match self.repair(&bytes, opts.strategy) {
            Ok(b) => b,
            Err(e) => {
                result.message = format!("failed to repair: {e}");
                return result;
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match std::fs::write(output, repaired) {
            Ok(()) => {
                result.success = true;
                result.message = format!("repaired with {}", opts.strategy);
            }
            Err(e) => {
                result.message = format!("failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Returns a [`ProcessResult`] for each image found; per-file failures
    /// are isolated.
    ///
    /// # Panics
    ///
    /// Panics if a directory entry has no filename (not possible for regular
    /// files).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<_> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .filter(|e| is_supported_image(e.path().as_path()))
                .collect(),
            Err(e) => {
                return vec![ProcessResult {
                    path: input_dir.to_path_buf(),
                    success: false,
                    skipped: false,
                    compliant_before: None,
                    message: format!("failed to read directory: {e}"),
                }];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult {
                    path: output_dir.to_path_buf(),
                    success: false,
                    skipped: false,
                    compliant_before: None,
                    message: format!("failed to create output directory: {e}"),
                }];
            }
        }

        let process = |entry: &std::fs::DirEntry| {
            let input_path = entry.path();
            let filename = input_path.file_stem().unwrap().to_string_lossy();
            let output_path = output_dir.join(format!("{filename}_fixed.png"));
            self.process_file(&input_path, &output_path, opts)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(process).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(process).collect()
        }
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(Error::Decode)
}

/// Encode an image losslessly as PNG.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "gif" | "bmp"
        ),
        None => false,
    }
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_fixed.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_fixed.png"))
}
