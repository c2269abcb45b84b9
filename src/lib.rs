//! Validate and repair raster images against a fixed 300x200 safe-area layout.
//!
//! Every image must render on a 300x200 canvas whose non-transparent content
//! fits inside an interior safe area without overlapping the reserved border,
//! and without a semi-transparent watermark in the bottom-right region. This
//! crate provides the pixel-level analysis and geometric-repair engine:
//! content-bounds detection, tolerance-based compliance scoring, watermark
//! heuristics, and three corrective transforms that preserve the image's
//! native resolution.
//!
//! # Quick Start
//!
//! ```no_run
//! use layout_compliance::{LayoutEngine, RepairStrategy};
//!
//! let engine = LayoutEngine::new();
//! let bytes = std::fs::read("car.png").unwrap();
//!
//! let report = engine.check(&bytes).unwrap();
//! if !report.compliant {
//!     let fixed = engine.repair(&bytes, RepairStrategy::SmartFit).unwrap();
//!     std::fs::write("car_fixed.png", fixed).unwrap();
//! }
//! ```
//!
//! # Coordinate spaces
//!
//! All geometric decisions are computed in a normalized 300x200 analysis
//! space; repairs are mapped back to and applied at the image's native
//! resolution. The safe area and tolerances live in [`LayoutConfig`] and are
//! passed explicitly into every component, so tests can substitute alternate
//! geometries.

#![deny(missing_docs)]

pub mod bounds;
pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod preview;
pub mod repair;
pub mod watermark;

pub use checker::{ComplianceReport, ReportInfo};
pub use config::{LayoutConfig, SafeArea, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use engine::{
    default_output_path, encode_png, is_supported_image, LayoutEngine, ProcessOptions,
    ProcessResult,
};
pub use error::{Error, Result};
pub use repair::RepairStrategy;
pub use watermark::WatermarkParams;
