//! # gridshed-io: Dataset Readers and Writers
//!
//! GeoJSON feature-collection I/O for transmission lines, service
//! territories, counties, and planning regions, plus CSV readers for the
//! tabular inputs (the BA-to-region mapping table and the ACS county
//! extract).
//!
//! Errors follow the pipeline-wide policy: any missing file or malformed
//! record aborts the run with a contextual error naming the file and row or
//! feature involved. There is no partial-read recovery.

pub mod geojson;
pub mod tables;

pub use geojson::{
    read_counties, read_lines, read_regions, read_territories, write_lines, write_merged_lines,
    write_regions,
};
pub use tables::{read_demographics, read_region_map};
