//! Planar geometry helpers shared by the pipeline stages: repair of
//! degenerate line geometries, bounding-box envelopes for the R-tree
//! coarse filter, and endpoint-stitching line merge.

use std::collections::HashMap;

use geo::{BoundingRect, Length, RemoveRepeatedPoints};
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon};
use rstar::AABB;

use gridshed_core::Kilometers;

/// Repair a line geometry before spatial processing: drop repeated
/// consecutive points and degenerate parts (fewer than two distinct
/// coordinates). The zero-width-buffer repair of the polygon world has no
/// line equivalent; a geometry this cannot fix propagates as-is and the
/// caller treats the empty result as unmergeable.
pub fn repair_multi_line(geometry: &MultiLineString<f64>) -> MultiLineString<f64> {
    let parts = geometry
        .0
        .iter()
        .map(|part| part.remove_repeated_points())
        .filter(|part| part.0.len() >= 2)
        .collect();
    MultiLineString(parts)
}

/// Bounding-box envelope of a line geometry, `None` when empty.
pub fn line_envelope(geometry: &MultiLineString<f64>) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    Some(AABB::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    ))
}

/// Bounding-box envelope of a polygon geometry, `None` when empty.
pub fn polygon_envelope(geometry: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    Some(AABB::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    ))
}

/// Planar length in kilometers, assuming map units are meters in the run's
/// shared projected CRS.
pub fn planar_length_km(geometry: &MultiLineString<f64>) -> Kilometers {
    Kilometers(geo::Euclidean.length(geometry) / 1000.0)
}

fn coord_key(c: Coord<f64>) -> (u64, u64) {
    (c.x.to_bits(), c.y.to_bits())
}

fn endpoints(part: &LineString<f64>) -> (Coord<f64>, Coord<f64>) {
    (part.0[0], part.0[part.0.len() - 1])
}

/// Merge contiguous line parts into maximal runs.
///
/// The set union of the members' parts (exact duplicates, in either
/// direction, collapse to one) is stitched wherever exactly two part
/// endpoints meet; junctions of three or more stay unmerged, as in the
/// classic line-merge operation. Part order and orientation of the output
/// follow the first part seen in each run.
pub fn stitch_lines(parts: Vec<LineString<f64>>) -> MultiLineString<f64> {
    // Set union: drop exact duplicates, treating a reversed copy as equal.
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<LineString<f64>> = Vec::with_capacity(parts.len());
    for part in parts {
        if part.0.len() < 2 {
            continue;
        }
        let forward: Vec<(u64, u64)> = part.0.iter().map(|c| coord_key(*c)).collect();
        let mut reverse = forward.clone();
        reverse.reverse();
        let key = forward.min(reverse);
        if seen.insert(key) {
            unique.push(part);
        }
    }

    // Endpoint degree over the unique parts; runs only pass through
    // degree-2 junctions.
    let mut degree: HashMap<(u64, u64), usize> = HashMap::new();
    for part in &unique {
        let (start, end) = endpoints(part);
        *degree.entry(coord_key(start)).or_insert(0) += 1;
        *degree.entry(coord_key(end)).or_insert(0) += 1;
    }

    // Endpoint -> part indices touching it.
    let mut touching: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (idx, part) in unique.iter().enumerate() {
        let (start, end) = endpoints(part);
        touching.entry(coord_key(start)).or_default().push(idx);
        touching.entry(coord_key(end)).or_default().push(idx);
    }

    let mut used = vec![false; unique.len()];
    let mut runs = Vec::new();
    for idx in 0..unique.len() {
        if used[idx] {
            continue;
        }
        used[idx] = true;
        let mut run: Vec<Coord<f64>> = unique[idx].0.clone();

        // Extend at the tail, then flip and extend the other way.
        for _ in 0..2 {
            loop {
                let tail = *run.last().unwrap();
                let key = coord_key(tail);
                if degree.get(&key) != Some(&2) {
                    break;
                }
                let next = touching
                    .get(&key)
                    .into_iter()
                    .flatten()
                    .copied()
                    .find(|&cand| !used[cand]);
                let Some(next) = next else { break };
                let (start, _) = endpoints(&unique[next]);
                used[next] = true;
                if coord_key(start) == key {
                    run.extend(unique[next].0.iter().skip(1));
                } else {
                    run.extend(unique[next].0.iter().rev().skip(1));
                }
            }
            run.reverse();
        }
        runs.push(LineString(run));
    }
    MultiLineString(runs)
}
