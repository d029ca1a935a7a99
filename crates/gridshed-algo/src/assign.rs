//! Spatial assignment of transmission lines to planning regions.
//!
//! Inner intersection join: a line lands in every region it intersects, so
//! a corridor crossing a seam is counted on both sides, matching the
//! source datasets' region extracts.

use geo::Intersects;
use rstar::{primitives::GeomWithData, RTree};
use tracing::info;

use gridshed_core::{LineFeature, PlanningRegion};

use crate::geometry::{line_envelope, polygon_envelope};

/// Per-region result of an assignment run, in the regions' input order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLines {
    pub region: String,
    pub lines: Vec<LineFeature>,
}

/// Assign each line to every region whose geometry it intersects.
///
/// Coarse filter via an R-tree over line bounding boxes queried with each
/// region's envelope, fine filter with the exact intersection predicate.
pub fn assign_lines(lines: &[LineFeature], regions: &[PlanningRegion]) -> Vec<RegionLines> {
    let tree = RTree::bulk_load(
        lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let envelope = line_envelope(&line.geometry)?;
                Some(GeomWithData::new(
                    rstar::primitives::Rectangle::from_aabb(envelope),
                    idx,
                ))
            })
            .collect(),
    );

    regions
        .iter()
        .map(|region| {
            let mut matched: Vec<usize> = match polygon_envelope(&region.geometry) {
                Some(envelope) => tree
                    .locate_in_envelope_intersecting(&envelope)
                    .map(|item| item.data)
                    .filter(|&idx| lines[idx].geometry.intersects(&region.geometry))
                    .collect(),
                None => Vec::new(),
            };
            matched.sort_unstable();
            info!(
                region = %region.name,
                lines = matched.len(),
                "assigned transmission lines"
            );
            RegionLines {
                region: region.name.clone(),
                lines: matched.into_iter().map(|idx| lines[idx].clone()).collect(),
            }
        })
        .collect()
}
