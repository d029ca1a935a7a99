//! # gridshed-core: Planning-Region Mapping Data Model
//!
//! Fundamental data structures for the gridshed pipeline: transmission-line
//! features with a closed AC/DC classification, balancing-authority
//! territories and dissolved planning regions, county demographics, unit
//! newtypes, and the unified error type.
//!
//! All geometries live in `geo-types` shapes and are assumed to share one
//! planar projected coordinate reference system per run; conversions between
//! reference systems happen upstream of this pipeline.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridshed_core::{Kilovolts, LineClass, LineFeature};
//! use geo_types::{line_string, MultiLineString};
//!
//! let geometry = MultiLineString(vec![line_string![
//!     (x: 0.0, y: 0.0),
//!     (x: 1000.0, y: 0.0),
//! ]]);
//! let line = LineFeature::new(1, "Example Power", Kilovolts(230.0), geometry)
//!     .with_type("AC; OVERHEAD");
//! assert_eq!(line.line_class(), Some(LineClass::Ac));
//! ```

pub mod demographics;
pub mod error;
pub mod line;
pub mod region;
pub mod units;

pub use demographics::CountyDemographics;
pub use error::{GridshedError, GridshedResult};
pub use line::{LineClass, LineFeature, MergedLine};
pub use region::{
    normalize_ba_name, state_code, BalancingArea, County, CountyPatch, PlanningRegion,
    RegionSpec, TerritoryStats, US_STATES,
};
pub use units::{Kilometers, Kilovolts, Megawatts, Miles, MILES_PER_KM};
