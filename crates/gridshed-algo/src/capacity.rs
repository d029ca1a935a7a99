//! Line-length and deliverable-capacity estimation.
//!
//! AC deliverability uses the surge-impedance-loading style approximation
//! from the source dataset's documentation: `P = V^2 * sin(30 deg) /
//! (L_km * PSR)` with a positive-sequence reactance of 0.327 ohm/km. DC
//! lines and lines of unknown class carry no estimate.

use chrono::Datelike;

use gridshed_core::{Kilovolts, LineClass, LineFeature, Megawatts, MergedLine};

use crate::geometry::planar_length_km;

/// Positive-sequence reactance assumed for every AC line, ohm/km.
const PSR_OHM_PER_KM: f64 = 0.327;

/// Counts reported after an analysis pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyzeSummary {
    pub input_lines: usize,
    pub dropped_negative_voltage: usize,
    pub ac_lines: usize,
}

/// Deliverable-power estimate for one AC line.
pub fn estimate_power_capacity(voltage: Kilovolts, length_km: f64) -> Option<Megawatts> {
    if length_km <= 0.0 {
        return None;
    }
    let e_o = voltage.value().powi(2) * (30.0_f64.to_radians()).sin();
    Some(Megawatts(e_o / (length_km * PSR_OHM_PER_KM)))
}

/// Year of the source record, from its RFC 3339 / `YYYY-MM-DD...` date.
pub fn source_year(source_date: &str) -> Option<i32> {
    let date = source_date.get(..10)?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

fn fill_derived(
    voltage: Kilovolts,
    class: Option<LineClass>,
    geometry: &geo_types::MultiLineString<f64>,
) -> (
    gridshed_core::Kilometers,
    gridshed_core::Miles,
    Option<Megawatts>,
    Option<f64>,
) {
    let length_km = planar_length_km(geometry);
    let length_mi = length_km.to_miles();
    let capacity = if class == Some(LineClass::Ac) {
        estimate_power_capacity(voltage, length_km.value())
    } else {
        None
    };
    // Zero capacity has no log; mirror the source's NaN replacement.
    let log_capacity = capacity
        .filter(|c| c.value() > 0.0)
        .map(|c| c.value().ln());
    (length_km, length_mi, capacity, log_capacity)
}

/// Drop negative-voltage records and fill in the derived columns (lengths,
/// AC capacity estimate, source year) on the survivors.
pub fn analyze_lines(lines: Vec<LineFeature>) -> (Vec<LineFeature>, AnalyzeSummary) {
    let mut summary = AnalyzeSummary {
        input_lines: lines.len(),
        ..Default::default()
    };
    let mut analyzed = Vec::with_capacity(lines.len());
    for mut line in lines {
        if line.voltage.value() < 0.0 {
            summary.dropped_negative_voltage += 1;
            continue;
        }
        let class = line.line_class();
        if class == Some(LineClass::Ac) {
            summary.ac_lines += 1;
        }
        let (km, mi, capacity, log_capacity) = fill_derived(line.voltage, class, &line.geometry);
        line.length_km = Some(km);
        line.length_mi = Some(mi);
        line.power_capacity = capacity;
        line.log_power_capacity = log_capacity;
        if line.source_year.is_none() {
            line.source_year = line.source_date.as_deref().and_then(source_year);
        }
        analyzed.push(line);
    }
    (analyzed, summary)
}

/// Recompute the derived columns on merged corridors (their geometry
/// changed, so lengths and capacity must be refreshed).
pub fn analyze_merged(merged: &mut [MergedLine]) {
    for line in merged.iter_mut() {
        let class = LineClass::parse(&line.type_desc);
        let (km, mi, capacity, log_capacity) = fill_derived(line.voltage, class, &line.geometry);
        line.length_km = Some(km);
        line.length_mi = Some(mi);
        line.power_capacity = capacity;
        line.log_power_capacity = log_capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, MultiLineString};

    fn line(kv: f64, type_desc: &str, length_m: f64) -> LineFeature {
        let geometry = MultiLineString(vec![line_string![
            (x: 0.0, y: 0.0),
            (x: length_m, y: 0.0),
        ]]);
        LineFeature::new(1, "X", Kilovolts(kv), geometry).with_type(type_desc)
    }

    #[test]
    fn test_capacity_formula() {
        // 230 kV over 100 km: P = 230^2 * 0.5 / (100 * 0.327)
        let capacity = estimate_power_capacity(Kilovolts(230.0), 100.0).unwrap();
        assert!((capacity.value() - 230.0_f64.powi(2) * 0.5 / 32.7).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_has_no_estimate() {
        assert_eq!(estimate_power_capacity(Kilovolts(230.0), 0.0), None);
    }

    #[test]
    fn test_analyze_fills_ac_only() {
        let (analyzed, summary) = analyze_lines(vec![
            line(230.0, "AC; OVERHEAD", 100_000.0),
            line(500.0, "DC; OVERHEAD", 100_000.0),
        ]);
        assert_eq!(summary.ac_lines, 1);
        assert!(analyzed[0].power_capacity.is_some());
        assert!(analyzed[0].log_power_capacity.is_some());
        assert!(analyzed[1].power_capacity.is_none());
        assert_eq!(analyzed[1].length_km, Some(gridshed_core::Kilometers(100.0)));
    }

    #[test]
    fn test_analyze_drops_negative_voltage() {
        let (analyzed, summary) = analyze_lines(vec![
            line(-999_999.0, "AC", 1000.0),
            line(115.0, "AC", 1000.0),
        ]);
        assert_eq!(analyzed.len(), 1);
        assert_eq!(summary.dropped_negative_voltage, 1);
    }

    #[test]
    fn test_source_year() {
        assert_eq!(source_year("2019-07-23T00:00:00Z"), Some(2019));
        assert_eq!(source_year("2019-07-23"), Some(2019));
        assert_eq!(source_year("unknown"), None);
    }
}
