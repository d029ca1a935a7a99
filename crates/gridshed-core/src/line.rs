//! Transmission-line feature model.
//!
//! Line records come from HIFLD-style GeoJSON extracts: a free-text `TYPE`
//! field ("AC; OVERHEAD", "DC; UNDERGROUND", ...), an `OWNER` identifier, a
//! nominal `VOLTAGE` in kV, and a line or multi-line geometry in a planar
//! projected coordinate system. [`LineClass`] replaces the raw substring
//! check on `TYPE` with a closed enumeration.

use geo_types::MultiLineString;
use serde::{Deserialize, Serialize};

use crate::units::{Kilometers, Kilovolts, Megawatts, Miles};

/// Current classification of a transmission line, parsed from the free-text
/// `TYPE` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineClass {
    Ac,
    Dc,
}

impl LineClass {
    /// Classify a raw type string by substring match.
    ///
    /// Precedence: "AC" wins when both substrings appear ("AC/DC" parses as
    /// AC). Strings containing neither substring are unclassified.
    pub fn parse(type_desc: &str) -> Option<LineClass> {
        if type_desc.contains("AC") {
            Some(LineClass::Ac)
        } else if type_desc.contains("DC") {
            Some(LineClass::Dc)
        } else {
            None
        }
    }

    /// The label used when resolving merged-group types.
    pub fn label(&self) -> &'static str {
        match self {
            LineClass::Ac => "AC",
            LineClass::Dc => "DC",
        }
    }
}

impl std::fmt::Display for LineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single transmission-line record.
///
/// `geometry` is normalized to a `MultiLineString`: single LineStrings are
/// wrapped as one-member multi-lines on read. Derived columns (`length_km`,
/// `power_capacity`, ...) are `None` until the capacity-analysis stage fills
/// them in.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    /// Source record identifier (HIFLD OBJECTID or similar).
    pub id: i64,
    /// Owning utility, verbatim from the source.
    pub owner: String,
    /// Nominal operating voltage. Negative values mark unknown voltage in
    /// the source data and are screened out during analysis.
    pub voltage: Kilovolts,
    /// Free-text type description, when present.
    pub type_desc: Option<String>,
    /// Operational status ("IN SERVICE", ...), when present.
    pub status: Option<String>,
    /// Source-record date, when present (RFC 3339 or `YYYY-MM-DD...`).
    pub source_date: Option<String>,
    /// Year extracted from `source_date`.
    pub source_year: Option<i32>,
    pub geometry: MultiLineString<f64>,
    pub length_km: Option<Kilometers>,
    pub length_mi: Option<Miles>,
    /// Surge-impedance deliverability estimate; AC lines only.
    pub power_capacity: Option<Megawatts>,
    /// Natural log of `power_capacity`; `None` for zero capacity.
    pub log_power_capacity: Option<f64>,
}

impl LineFeature {
    pub fn new(id: i64, owner: impl Into<String>, voltage: Kilovolts, geometry: MultiLineString<f64>) -> Self {
        LineFeature {
            id,
            owner: owner.into(),
            voltage,
            type_desc: None,
            status: None,
            source_date: None,
            source_year: None,
            geometry,
            length_km: None,
            length_mi: None,
            power_capacity: None,
            log_power_capacity: None,
        }
    }

    pub fn with_type(mut self, type_desc: impl Into<String>) -> Self {
        self.type_desc = Some(type_desc.into());
        self
    }

    /// Classification derived from `type_desc`.
    pub fn line_class(&self) -> Option<LineClass> {
        self.type_desc.as_deref().and_then(LineClass::parse)
    }
}

/// One merged corridor produced by the line-merging aggregator: a maximal
/// set of input records sharing owner, voltage, and [`LineClass`] that were
/// claimed by one seed's bounding-box pass, collapsed to a single geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedLine {
    pub owner: String,
    pub voltage: Kilovolts,
    /// Resolved type: the single shared type string, or the group's class
    /// label when every member type contains it.
    pub type_desc: String,
    /// Audit trail: comma-joined distinct source type strings, in first-seen
    /// order.
    pub merged_types: String,
    /// Source record ids absorbed into this corridor.
    pub member_ids: Vec<i64>,
    pub geometry: MultiLineString<f64>,
    pub length_km: Option<Kilometers>,
    pub length_mi: Option<Miles>,
    pub power_capacity: Option<Megawatts>,
    pub log_power_capacity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::line_string;

    #[test]
    fn test_line_class_parse() {
        assert_eq!(LineClass::parse("AC; OVERHEAD"), Some(LineClass::Ac));
        assert_eq!(LineClass::parse("DC; UNDERGROUND"), Some(LineClass::Dc));
        assert_eq!(LineClass::parse("NOT AVAILABLE"), None);
    }

    #[test]
    fn test_line_class_precedence_ac_wins() {
        // "AC/DC" contains both substrings; AC is checked first.
        assert_eq!(LineClass::parse("AC/DC"), Some(LineClass::Ac));
        // "DC, AC" likewise.
        assert_eq!(LineClass::parse("DC; AC"), Some(LineClass::Ac));
    }

    #[test]
    fn test_feature_class_derivation() {
        let geom = MultiLineString(vec![line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]]);
        let feature = LineFeature::new(1, "X", Kilovolts(115.0), geom).with_type("DC; OVERHEAD");
        assert_eq!(feature.line_class(), Some(LineClass::Dc));
    }
}
