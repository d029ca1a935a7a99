//! CSV readers for the tabular inputs: the BA-to-region mapping table and
//! the county demographics extract.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;

use gridshed_core::{normalize_ba_name, CountyDemographics};

/// CSV record mapping a balancing authority to its planning region.
/// A trailing free-text `Notes` column may be present and is ignored.
#[derive(Deserialize)]
struct RegionMapRecord {
    #[serde(rename = "Balancing Authority")]
    balancing_authority: String,
    #[serde(rename = "FERC_1000 Regions")]
    region: String,
}

/// Read the BA-to-region mapping table, keyed by normalized BA name.
pub fn read_region_map(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening region mapping table '{}'", path.display()))?;
    let mut map = HashMap::new();
    for (row, record) in reader.deserialize::<RegionMapRecord>().enumerate() {
        let record = record
            .with_context(|| format!("parsing row {} of '{}'", row + 1, path.display()))?;
        map.insert(
            normalize_ba_name(&record.balancing_authority),
            record.region.trim().to_string(),
        );
    }
    Ok(map)
}

/// Read the local ACS county extract, keyed by GEOID.
///
/// Rows with zero or missing total population are dropped up front; every
/// downstream aggregate is population-weighted and would divide by zero.
pub fn read_demographics(path: &Path) -> Result<HashMap<String, CountyDemographics>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening demographics extract '{}'", path.display()))?;
    let mut counties = HashMap::new();
    for (row, record) in reader.deserialize::<CountyDemographics>().enumerate() {
        let record = record
            .with_context(|| format!("parsing row {} of '{}'", row + 1, path.display()))?;
        if record.total_population > 0.0 {
            counties.insert(record.geoid.clone(), record);
        }
    }
    Ok(counties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_region_map() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Balancing Authority,FERC_1000 Regions,Notes").unwrap();
        writeln!(file, "  PJM Interconnection LLC ,PJM,legacy name").unwrap();
        writeln!(file, "electric reliability council of texas,ERCOT,").unwrap();
        let map = read_region_map(file.path()).unwrap();
        assert_eq!(
            map.get("pjm interconnection llc").map(String::as_str),
            Some("PJM")
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_read_demographics_drops_empty_counties() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "GEOID,Total_Population,Median_Age,Median_Household_Income,\
             White_Population,Black_Population,Asian_Population,Hispanic_Population"
        )
        .unwrap();
        writeln!(file, "06075,873965,38.2,112449,353354,46725,301163,131797").unwrap();
        writeln!(file, "48301,0,0,0,0,0,0,0").unwrap();
        let counties = read_demographics(file.path()).unwrap();
        assert_eq!(counties.len(), 1);
        assert!(counties.contains_key("06075"));
    }

    #[test]
    fn test_missing_table_aborts() {
        assert!(read_region_map(Path::new("/nonexistent/map.csv")).is_err());
    }
}
