//! Region summary rows: county demographics joined onto each region's
//! footprint, plus transmission totals from the merged corridors.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use geo::Intersects;
use polars::prelude::*;
use tracing::info;

use gridshed_core::{County, CountyDemographics, LineFeature, PlanningRegion};

/// One summary row. Aggregates over counties intersecting the region:
/// population-weighted means for the median columns, population-share
/// percentages for race/ethnicity. Regions with no county coverage carry
/// zeros (the source's fillna behavior).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub total_population: f64,
    pub median_age: f64,
    pub median_household_income: f64,
    pub percent_white: f64,
    pub percent_black: f64,
    pub percent_asian: f64,
    pub percent_hispanic: f64,
    pub total_power_capacity: f64,
    pub total_line_length_mi: f64,
    /// Count of lines per type string, over the union of type strings seen
    /// across all summarized regions.
    pub type_counts: Vec<(String, i64)>,
}

/// Summarize each region from its merged transmission lines and the county
/// demographics extract.
pub fn summarize_regions(
    regions: &[PlanningRegion],
    lines_by_region: &[(String, Vec<LineFeature>)],
    counties: &[County],
    demographics: &HashMap<String, CountyDemographics>,
) -> Vec<RegionSummary> {
    // Union of type strings across every region, sorted, so all rows share
    // one column set.
    let all_types: BTreeSet<String> = lines_by_region
        .iter()
        .flat_map(|(_, lines)| lines.iter().filter_map(|l| l.type_desc.clone()))
        .collect();

    regions
        .iter()
        .map(|region| {
            let lines = lines_by_region
                .iter()
                .find(|(name, _)| name == &region.name)
                .map(|(_, lines)| lines.as_slice())
                .unwrap_or(&[]);
            let mut summary = demographic_aggregates(region, counties, demographics);
            summary.total_power_capacity = lines
                .iter()
                .filter_map(|l| l.power_capacity.map(|v| v.value()))
                .sum();
            summary.total_line_length_mi = lines
                .iter()
                .filter_map(|l| l.length_mi.map(|v| v.value()))
                .sum();
            summary.type_counts = all_types
                .iter()
                .map(|t| {
                    let count = lines
                        .iter()
                        .filter(|l| l.type_desc.as_deref() == Some(t.as_str()))
                        .count() as i64;
                    (t.clone(), count)
                })
                .collect();
            info!(
                region = %region.name,
                population = summary.total_population,
                line_miles = summary.total_line_length_mi,
                "summarized region"
            );
            summary
        })
        .collect()
}

fn demographic_aggregates(
    region: &PlanningRegion,
    counties: &[County],
    demographics: &HashMap<String, CountyDemographics>,
) -> RegionSummary {
    let mut total_population = 0.0;
    let mut weighted_age = 0.0;
    let mut weighted_income = 0.0;
    let mut white = 0.0;
    let mut black = 0.0;
    let mut asian = 0.0;
    let mut hispanic = 0.0;

    for county in counties {
        let Some(demo) = demographics.get(&county.geoid) else {
            continue;
        };
        if !county.geometry.intersects(&region.geometry) {
            continue;
        }
        total_population += demo.total_population;
        weighted_age += demo.median_age * demo.total_population;
        weighted_income += demo.median_household_income * demo.total_population;
        white += demo.white_population;
        black += demo.black_population;
        asian += demo.asian_population;
        hispanic += demo.hispanic_population;
    }

    // No coverage (or zero population) zeroes the whole demographic block.
    let (median_age, median_household_income, pw, pb, pa, ph) = if total_population > 0.0 {
        (
            weighted_age / total_population,
            weighted_income / total_population,
            white / total_population * 100.0,
            black / total_population * 100.0,
            asian / total_population * 100.0,
            hispanic / total_population * 100.0,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    };

    RegionSummary {
        region: region.name.clone(),
        total_population,
        median_age,
        median_household_income,
        percent_white: pw,
        percent_black: pb,
        percent_asian: pa,
        percent_hispanic: ph,
        total_power_capacity: 0.0,
        total_line_length_mi: 0.0,
        type_counts: Vec::new(),
    }
}

/// Build the summary DataFrame, one row per region, type-count columns
/// last.
pub fn summary_frame(summaries: &[RegionSummary]) -> Result<DataFrame> {
    let mut columns = vec![
        Series::new(
            "Region",
            summaries.iter().map(|s| s.region.as_str()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Total_Population",
            summaries.iter().map(|s| s.total_population).collect::<Vec<_>>(),
        ),
        Series::new(
            "Median_Age",
            summaries.iter().map(|s| s.median_age).collect::<Vec<_>>(),
        ),
        Series::new(
            "Median_Household_Income",
            summaries
                .iter()
                .map(|s| s.median_household_income)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "Percent_White",
            summaries.iter().map(|s| s.percent_white).collect::<Vec<_>>(),
        ),
        Series::new(
            "Percent_Black",
            summaries.iter().map(|s| s.percent_black).collect::<Vec<_>>(),
        ),
        Series::new(
            "Percent_Asian",
            summaries.iter().map(|s| s.percent_asian).collect::<Vec<_>>(),
        ),
        Series::new(
            "Percent_Hispanic",
            summaries.iter().map(|s| s.percent_hispanic).collect::<Vec<_>>(),
        ),
        Series::new(
            "Total_Power_Capacity",
            summaries
                .iter()
                .map(|s| s.total_power_capacity)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "Total_Line_Length_MI",
            summaries
                .iter()
                .map(|s| s.total_line_length_mi)
                .collect::<Vec<_>>(),
        ),
    ];
    if let Some(first) = summaries.first() {
        for (idx, (type_name, _)) in first.type_counts.iter().enumerate() {
            let values: Vec<i64> = summaries
                .iter()
                .map(|s| s.type_counts.get(idx).map(|(_, n)| *n).unwrap_or(0))
                .collect();
            columns.push(Series::new(type_name, values));
        }
    }
    DataFrame::new(columns).context("assembling region summary DataFrame")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, polygon, MultiLineString, MultiPolygon};
    use gridshed_core::{Kilovolts, Megawatts, Miles, TerritoryStats};

    fn region(name: &str, x0: f64, size: f64) -> PlanningRegion {
        PlanningRegion {
            name: name.to_string(),
            stats: TerritoryStats::default(),
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: 0.0),
                (x: x0 + size, y: 0.0),
                (x: x0 + size, y: size),
                (x: x0, y: size),
            ]]),
        }
    }

    fn county(geoid: &str, x0: f64) -> County {
        County {
            geoid: geoid.to_string(),
            name: geoid.to_string(),
            state: "TX".to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: 0.0),
                (x: x0 + 1.0, y: 0.0),
                (x: x0 + 1.0, y: 1.0),
                (x: x0, y: 1.0),
            ]]),
        }
    }

    fn demo(geoid: &str, population: f64, age: f64) -> (String, CountyDemographics) {
        (
            geoid.to_string(),
            CountyDemographics {
                geoid: geoid.to_string(),
                total_population: population,
                median_age: age,
                median_household_income: 50_000.0,
                white_population: population / 2.0,
                black_population: population / 4.0,
                asian_population: population / 8.0,
                hispanic_population: population / 8.0,
            },
        )
    }

    fn merged_line(type_desc: &str, capacity: f64, miles: f64) -> LineFeature {
        let geometry = MultiLineString(vec![line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
        ]]);
        let mut line = LineFeature::new(1, "X", Kilovolts(115.0), geometry).with_type(type_desc);
        line.power_capacity = Some(Megawatts(capacity));
        line.length_mi = Some(Miles(miles));
        line
    }

    #[test]
    fn test_population_weighted_aggregates() {
        let regions = vec![region("A", 0.0, 2.0)];
        let counties = vec![county("001", 0.0), county("002", 1.0), county("999", 50.0)];
        let demographics: HashMap<_, _> = vec![
            demo("001", 1000.0, 30.0),
            demo("002", 3000.0, 40.0),
            demo("999", 100.0, 99.0),
        ]
        .into_iter()
        .collect();
        let lines = vec![(
            "A".to_string(),
            vec![merged_line("AC", 100.0, 10.0), merged_line("DC", 50.0, 5.0)],
        )];
        let summaries = summarize_regions(&regions, &lines, &counties, &demographics);
        let s = &summaries[0];
        assert_eq!(s.total_population, 4000.0);
        assert!((s.median_age - 37.5).abs() < 1e-9);
        assert_eq!(s.percent_white, 50.0);
        assert_eq!(s.total_power_capacity, 150.0);
        assert_eq!(s.total_line_length_mi, 15.0);
        assert_eq!(
            s.type_counts,
            vec![("AC".to_string(), 1), ("DC".to_string(), 1)]
        );
    }

    #[test]
    fn test_region_without_counties_is_zeroed() {
        let regions = vec![region("B", 100.0, 1.0)];
        let counties = vec![county("001", 0.0)];
        let demographics: HashMap<_, _> = vec![demo("001", 1000.0, 30.0)].into_iter().collect();
        let summaries = summarize_regions(&regions, &[], &counties, &demographics);
        assert_eq!(summaries[0].total_population, 0.0);
        assert_eq!(summaries[0].median_age, 0.0);
    }

    #[test]
    fn test_summary_frame_columns() {
        let regions = vec![region("A", 0.0, 2.0)];
        let lines = vec![("A".to_string(), vec![merged_line("AC", 1.0, 1.0)])];
        let summaries = summarize_regions(&regions, &lines, &[], &HashMap::new());
        let df = summary_frame(&summaries).unwrap();
        assert_eq!(df.height(), 1);
        assert!(df.column("AC").is_ok());
        assert!(df.column("Total_Power_Capacity").is_ok());
    }
}
