//! # gridshed-algo: Pipeline Stages for Planning-Region Construction
//!
//! This crate implements the geometric and analytical stages of the
//! gridshed pipeline:
//!
//! | Stage | Entry point | Description |
//! |-------|-------------|-------------|
//! | Regions | [`build_regions`] | Dissolve balancing-authority territories into planning regions |
//! | Assign | [`assign_lines`] | Bucket transmission lines by region footprint |
//! | Analyze | [`analyze_lines`] | Length, capacity, and source-year derivation |
//! | Merge | [`merge_lines`] | Collapse touching same-owner/voltage/class lines into corridors |
//! | Describe | [`describe_numeric`], [`value_counts`] | Descriptive statistics over line attributes |
//! | Summarize | [`summarize_regions`] | Demographics and transmission totals per region |
//!
//! All geometry work assumes a single planar projected coordinate system;
//! inputs are never reprojected here. Spatial queries run through an
//! [`rstar`] bounding-box index with an exact [`geo::Intersects`] refinement.
//!
//! ## Example
//!
//! ```ignore
//! use gridshed_algo::merge_lines;
//!
//! let report = merge_lines(&features);
//! println!("{} corridors from {} lines", report.merged.len(), report.input_features);
//! for skipped in &report.skipped {
//!     eprintln!("skipped {:?}: {}", skipped.member_ids, skipped.reason);
//! }
//! ```

pub mod assign;
pub mod capacity;
pub mod describe;
pub mod geometry;
pub mod merge;
pub mod regions;
pub mod summary;

pub use assign::{assign_lines, RegionLines};
pub use capacity::{
    analyze_lines, analyze_merged, estimate_power_capacity, source_year, AnalyzeSummary,
};
pub use describe::{
    describe_numeric, line_frame, value_counts, write_csv, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS,
};
pub use geometry::{planar_length_km, repair_multi_line, stitch_lines};
pub use merge::{merge_lines, MergeReport, SkipReason, SkippedGroup};
pub use regions::{build_regions, RegionBuildSummary};
pub use summary::{summarize_regions, summary_frame, RegionSummary};
