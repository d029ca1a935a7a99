//! Balancing-authority territories, planning regions, and the region-build
//! configuration.

use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{GridshedError, GridshedResult};

/// Capacity/load figures carried on a territory and summed per region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerritoryStats {
    pub total_cap: f64,
    pub avail_cap: f64,
    pub peak_load: f64,
    pub min_load: f64,
    pub shape_area: f64,
    pub shape_length: f64,
}

impl TerritoryStats {
    pub fn accumulate(&mut self, other: &TerritoryStats) {
        self.total_cap += other.total_cap;
        self.avail_cap += other.avail_cap;
        self.peak_load += other.peak_load;
        self.min_load += other.min_load;
        self.shape_area += other.shape_area;
        self.shape_length += other.shape_length;
    }
}

/// A balancing-authority service territory (one control-area record).
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingArea {
    /// BA name, normalized to lowercase/trimmed on read so it joins cleanly
    /// against the mapping table.
    pub name: String,
    /// Two-letter state code.
    pub state: String,
    pub stats: Option<TerritoryStats>,
    pub geometry: MultiPolygon<f64>,
}

/// A dissolved planning region with summed territory figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningRegion {
    pub name: String,
    pub stats: TerritoryStats,
    pub geometry: MultiPolygon<f64>,
}

/// County boundary record used for region patching and the demographics
/// join.
#[derive(Debug, Clone, PartialEq)]
pub struct County {
    /// Five-digit FIPS GEOID (state + county).
    pub geoid: String,
    pub name: String,
    /// Two-letter state code.
    pub state: String,
    pub geometry: MultiPolygon<f64>,
}

/// A county-patch rule: dissolve the named counties (or a whole state) into
/// an existing region's geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyPatch {
    /// Two-letter state code, matched case-insensitively.
    pub state: String,
    /// County names to include; empty means every county in the state.
    #[serde(default)]
    pub counties: Vec<String>,
    /// Region receiving the patched geometry.
    pub region: String,
}

/// Configuration for the region-build stage.
///
/// Defaults reproduce the published FERC Order 1000 approximation: eight
/// regions, the SERTP/FRCC/SCRTP roll-up into SE, the SPP/SE overlap
/// subtraction, and the Southeast county patches. Serde-deserializable so a
/// JSON file can override any of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSpec {
    /// States whose territories participate.
    pub states: Vec<String>,
    /// Regions dropped right after the mapping join.
    pub excluded_regions: Vec<String>,
    /// Regions exempt from the capacity/load validity screen.
    pub screen_exempt: Vec<String>,
    /// Region renames applied after the first dissolve (old name -> new).
    pub renames: BTreeMap<String, String>,
    /// Overlap subtractions: for each `(minuend, subtrahend)` the
    /// subtrahend region's geometry is removed from the minuend's.
    pub subtract_overlaps: Vec<(String, String)>,
    /// County geometries unioned into a region after overlap subtraction.
    pub county_patches: Vec<CountyPatch>,
    /// Final keep-list; regions not named here are dropped.
    pub keep: Vec<String>,
}

impl Default for RegionSpec {
    fn default() -> Self {
        let renames = [("SERTP", "SE"), ("FRCC", "SE"), ("SCRTP", "SE")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        RegionSpec {
            states: US_STATES.iter().map(|s| s.to_string()).collect(),
            excluded_regions: vec!["WestConnect".to_string()],
            screen_exempt: vec!["NYISO".to_string()],
            renames,
            subtract_overlaps: vec![("SE".to_string(), "SPP".to_string())],
            county_patches: vec![
                CountyPatch {
                    state: "FL".to_string(),
                    counties: vec![],
                    region: "SE".to_string(),
                },
                CountyPatch {
                    state: "SC".to_string(),
                    counties: vec![],
                    region: "SE".to_string(),
                },
                CountyPatch {
                    state: "AL".to_string(),
                    counties: vec![],
                    region: "SE".to_string(),
                },
                CountyPatch {
                    state: "TN".to_string(),
                    counties: vec![
                        "Monroe".to_string(),
                        "Blount".to_string(),
                        "Sevier".to_string(),
                    ],
                    region: "SE".to_string(),
                },
            ],
            keep: ["SE", "NYISO", "ERCOT", "CAISO", "MISO", "ISO-NE", "PJM", "SPP"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RegionSpec {
    /// Validate an override spec before a region build.
    pub fn validate(&self) -> GridshedResult<()> {
        if self.states.is_empty() {
            return Err(GridshedError::Config(
                "region spec names no states".to_string(),
            ));
        }
        if self.keep.is_empty() {
            return Err(GridshedError::Config(
                "region spec has an empty keep-list".to_string(),
            ));
        }
        for state in &self.states {
            if !US_STATES.contains(&state.as_str()) {
                return Err(GridshedError::Validation(format!(
                    "'{state}' is not a state postal code"
                )));
            }
        }
        Ok(())
    }
}

/// The 50 US state postal codes.
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Normalize a BA name for joining: lowercase, trimmed.
pub fn normalize_ba_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolve a state identifier to its postal code. Accepts either the code
/// itself ("TN") or the full name ("Tennessee"); county files carry full
/// names.
pub fn state_code(state: &str) -> Option<&'static str> {
    let state = state.trim();
    if state.len() == 2 {
        let upper = state.to_uppercase();
        return US_STATES.iter().find(|s| **s == upper).copied();
    }
    let lower = state.to_lowercase();
    STATE_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| *code)
}

/// Full state names (lowercase) to postal codes.
const STATE_NAMES: [(&str, &str); 50] = [
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_regions() {
        let spec = RegionSpec::default();
        assert_eq!(spec.keep.len(), 8);
        assert_eq!(spec.renames.get("FRCC").map(String::as_str), Some("SE"));
        assert!(spec.states.contains(&"TX".to_string()));
        assert_eq!(spec.states.len(), 50);
    }

    #[test]
    fn test_spec_validation() {
        assert!(RegionSpec::default().validate().is_ok());
        let bad = RegionSpec {
            states: vec!["ZZ".to_string()],
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(GridshedError::Validation(_))));
        let empty = RegionSpec {
            keep: vec![],
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(GridshedError::Config(_))));
    }

    #[test]
    fn test_spec_roundtrip_json() {
        let spec = RegionSpec::default();
        let json = serde_json::to_string(&spec).unwrap();
        let back: RegionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn test_state_code() {
        assert_eq!(state_code("Tennessee"), Some("TN"));
        assert_eq!(state_code("tn"), Some("TN"));
        assert_eq!(state_code("Puerto Rico"), None);
    }

    #[test]
    fn test_normalize_ba_name() {
        assert_eq!(normalize_ba_name("  PJM Interconnection, LLC "), "pjm interconnection, llc");
    }

    #[test]
    fn test_stats_accumulate() {
        let mut a = TerritoryStats {
            total_cap: 10.0,
            avail_cap: 5.0,
            ..Default::default()
        };
        a.accumulate(&TerritoryStats {
            total_cap: 2.0,
            avail_cap: 1.0,
            ..Default::default()
        });
        assert_eq!(a.total_cap, 12.0);
        assert_eq!(a.avail_cap, 6.0);
    }
}
