//! Region builder: aggregate balancing-authority service territories into
//! approximate FERC Order 1000 planning regions.
//!
//! The stage is a straight pipeline over immutable inputs: state filter,
//! mapping-table join, validity screen, per-region dissolve, then the
//! configured shape adjustments (renames, overlap subtraction, county
//! patches, keep-list). All configuration lives in
//! [`RegionSpec`](gridshed_core::RegionSpec); the defaults reproduce the
//! published eight-region approximation.

use std::collections::BTreeMap;

use anyhow::Result;
use geo::{unary_union, BooleanOps};
use geo_types::MultiPolygon;
use tracing::info;

use gridshed_core::{BalancingArea, County, PlanningRegion, RegionSpec, TerritoryStats};

/// Counts reported after a region build.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionBuildSummary {
    pub input_territories: usize,
    pub joined_territories: usize,
    pub screened_out: usize,
    pub regions: usize,
}

/// Build planning regions from territories, the BA-to-region mapping, and
/// county boundaries for patching.
pub fn build_regions(
    territories: &[BalancingArea],
    region_map: &std::collections::HashMap<String, String>,
    counties: &[County],
    spec: &RegionSpec,
) -> Result<(Vec<PlanningRegion>, RegionBuildSummary)> {
    spec.validate()?;
    let mut summary = RegionBuildSummary {
        input_territories: territories.len(),
        ..Default::default()
    };

    // State filter + mapping join. Territories without a region assignment
    // or in an excluded region drop out here.
    let mut joined: Vec<(&BalancingArea, String)> = Vec::new();
    for territory in territories {
        if !spec.states.iter().any(|s| *s == territory.state) {
            continue;
        }
        let Some(region) = region_map.get(&territory.name) else {
            continue;
        };
        if spec.excluded_regions.iter().any(|r| r == region) {
            continue;
        }
        joined.push((territory, region.clone()));
    }
    summary.joined_territories = joined.len();

    // Validity screen on the capacity/load figures, exempted regions pass
    // through untouched.
    joined.retain(|(territory, region)| {
        if spec.screen_exempt.iter().any(|r| r == region) {
            return true;
        }
        let keep = territory.stats.as_ref().is_some_and(stats_are_valid);
        if !keep {
            summary.screened_out += 1;
        }
        keep
    });

    // Group by region: sum the stat columns, dissolve the geometries.
    let mut groups: BTreeMap<String, (TerritoryStats, Vec<&MultiPolygon<f64>>)> = BTreeMap::new();
    for (territory, region) in &joined {
        let entry = groups.entry(region.clone()).or_default();
        if let Some(stats) = &territory.stats {
            entry.0.accumulate(stats);
        }
        entry.1.push(&territory.geometry);
    }

    // Renames fold groups together (SERTP/FRCC/SCRTP -> SE by default);
    // folded groups re-sum and re-dissolve.
    let mut renamed: BTreeMap<String, (TerritoryStats, Vec<&MultiPolygon<f64>>)> = BTreeMap::new();
    for (name, (stats, geoms)) in groups {
        let name = spec.renames.get(&name).cloned().unwrap_or(name);
        let entry = renamed.entry(name).or_default();
        entry.0.accumulate(&stats);
        entry.1.extend(geoms);
    }

    let mut regions: BTreeMap<String, PlanningRegion> = renamed
        .into_iter()
        .map(|(name, (stats, geoms))| {
            let geometry = unary_union(geoms);
            (
                name.clone(),
                PlanningRegion {
                    name,
                    stats,
                    geometry,
                },
            )
        })
        .collect();

    // Overlap subtraction: remove the subtrahend region's footprint from
    // the minuend's (SPP out of SE by default).
    for (minuend, subtrahend) in &spec.subtract_overlaps {
        let Some(subtrahend_geom) = regions.get(subtrahend).map(|r| r.geometry.clone()) else {
            continue;
        };
        if let Some(region) = regions.get_mut(minuend) {
            region.geometry = region.geometry.difference(&subtrahend_geom);
        }
    }

    // County patches: union the named counties (or whole states) into a
    // region's geometry.
    for patch in &spec.county_patches {
        let selected: Vec<&MultiPolygon<f64>> = counties
            .iter()
            .filter(|county| {
                county.state.eq_ignore_ascii_case(&patch.state)
                    && (patch.counties.is_empty()
                        || patch
                            .counties
                            .iter()
                            .any(|name| name.eq_ignore_ascii_case(&county.name)))
            })
            .map(|county| &county.geometry)
            .collect();
        if selected.is_empty() {
            continue;
        }
        let addition = unary_union(selected);
        if let Some(region) = regions.get_mut(&patch.region) {
            region.geometry = region.geometry.union(&addition);
        }
    }

    // Final keep-list.
    let regions: Vec<PlanningRegion> = spec
        .keep
        .iter()
        .filter_map(|name| regions.remove(name))
        .collect();
    summary.regions = regions.len();
    info!(
        territories = summary.joined_territories,
        screened_out = summary.screened_out,
        regions = summary.regions,
        "built planning regions"
    );
    Ok((regions, summary))
}

fn stats_are_valid(stats: &TerritoryStats) -> bool {
    stats.total_cap >= 0.0
        && stats.avail_cap >= 0.0
        && stats.peak_load >= 0.0
        && stats.min_load >= 0.0
        && stats.avail_cap <= stats.total_cap
        && stats.peak_load >= stats.min_load
}
