//! Line-merging aggregator: collapse redundant transmission-line records
//! that describe the same physical corridor (same owner, same voltage,
//! compatible AC/DC class, spatially touching) into single merged
//! geometries, so downstream length/capacity sums do not double-count.

use geo::Intersects;
use rstar::{primitives::GeomWithData, RTree};
use tracing::warn;

use gridshed_core::{Kilovolts, LineFeature, MergedLine};

use crate::geometry::{line_envelope, repair_multi_line, stitch_lines};

/// Why a claimed group produced no output feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Member type strings neither agree nor all contain the seed's class
    /// label; no partial/best-effort type is ever emitted.
    AmbiguousType,
    /// The seed's type field classifies as neither AC nor DC, so the fine
    /// filter can never match it, not even against itself.
    UnclassifiedType,
    /// Repair left no usable line parts in the group.
    EmptyGeometry,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AmbiguousType => f.write_str("ambiguous type"),
            SkipReason::UnclassifiedType => f.write_str("unclassified type"),
            SkipReason::EmptyGeometry => f.write_str("empty geometry"),
        }
    }
}

/// A claimed group that was dropped. Its members stay claimed; they are
/// never released back into the unprocessed pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGroup {
    pub owner: String,
    pub voltage: Kilovolts,
    pub member_ids: Vec<i64>,
    pub reason: SkipReason,
}

/// Result of one aggregator run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeReport {
    pub merged: Vec<MergedLine>,
    pub skipped: Vec<SkippedGroup>,
    /// Number of input features.
    pub input_features: usize,
    /// Number of input features claimed by emitted groups.
    pub merged_features: usize,
}

/// Group intersecting lines that share owner, voltage, and
/// [`LineClass`](gridshed_core::LineClass),
/// and collapse each group to one merged feature.
///
/// Grouping is deliberately single-hop: candidates come from the seed's
/// bounding-box query and the fine intersection test runs against the seed
/// only, so a feature touching a member of the group but outside the seed's
/// envelope lands in a later group. Extending to full transitive closure
/// would be more physically faithful for long corridors but changes output
/// counts; the observed single-pass behavior is kept.
///
/// Every feature is claimed by at most one group: the whole match set is
/// marked processed as soon as the seed claims it, even when the group is
/// later dropped.
pub fn merge_lines(lines: &[LineFeature]) -> MergeReport {
    // Repaired geometries drive the index, the predicates, and the output.
    let repaired: Vec<_> = lines
        .iter()
        .map(|line| repair_multi_line(&line.geometry))
        .collect();

    let tree = RTree::bulk_load(
        repaired
            .iter()
            .enumerate()
            .filter_map(|(idx, geometry)| {
                let envelope = line_envelope(geometry)?;
                Some(GeomWithData::new(
                    rstar::primitives::Rectangle::from_aabb(envelope),
                    idx,
                ))
            })
            .collect(),
    );

    let mut report = MergeReport {
        input_features: lines.len(),
        ..Default::default()
    };
    let mut processed = vec![false; lines.len()];

    for (idx, seed) in lines.iter().enumerate() {
        if processed[idx] {
            continue;
        }

        let Some(seed_class) = seed.line_class() else {
            processed[idx] = true;
            skip(
                &mut report,
                seed,
                vec![seed.id],
                SkipReason::UnclassifiedType,
            );
            continue;
        };
        let Some(envelope) = line_envelope(&repaired[idx]) else {
            processed[idx] = true;
            skip(&mut report, seed, vec![seed.id], SkipReason::EmptyGeometry);
            continue;
        };

        // Coarse filter: bounding boxes overlapping the seed's. Candidate
        // order from the tree is arbitrary; sort for deterministic output.
        let mut candidates: Vec<usize> = tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|item| item.data)
            .collect();
        candidates.sort_unstable();

        // Fine filter: unclaimed features with identical owner/voltage/
        // class and actual intersection with the seed (not pairwise among
        // members).
        let members: Vec<usize> = candidates
            .into_iter()
            .filter(|&cand| {
                let line = &lines[cand];
                !processed[cand]
                    && line.owner == seed.owner
                    && line.voltage == seed.voltage
                    && line.line_class() == Some(seed_class)
                    && repaired[cand].intersects(&repaired[idx])
            })
            .collect();

        // First seed to claim a feature wins.
        for &member in &members {
            processed[member] = true;
        }
        let member_ids: Vec<i64> = members.iter().map(|&m| lines[m].id).collect();

        let parts: Vec<_> = members
            .iter()
            .flat_map(|&m| repaired[m].0.iter().cloned())
            .collect();
        if parts.is_empty() {
            skip(&mut report, seed, member_ids, SkipReason::EmptyGeometry);
            continue;
        }
        let geometry = if parts.len() == 1 {
            geo_types::MultiLineString(parts)
        } else {
            stitch_lines(parts)
        };
        if geometry.0.is_empty() {
            skip(&mut report, seed, member_ids, SkipReason::EmptyGeometry);
            continue;
        }

        // Distinct member type strings, first-seen order. Members always
        // carry a type: the class fine-filter already required one.
        let mut types: Vec<&str> = Vec::new();
        for &member in &members {
            if let Some(type_desc) = lines[member].type_desc.as_deref() {
                if !types.contains(&type_desc) {
                    types.push(type_desc);
                }
            }
        }
        let resolved = if types.len() == 1 {
            types[0].to_string()
        } else if types.iter().all(|t| t.contains(seed_class.label())) {
            seed_class.label().to_string()
        } else {
            skip(&mut report, seed, member_ids, SkipReason::AmbiguousType);
            continue;
        };

        report.merged_features += members.len();
        report.merged.push(MergedLine {
            owner: seed.owner.clone(),
            voltage: seed.voltage,
            type_desc: resolved,
            merged_types: types.join(", "),
            member_ids,
            geometry,
            length_km: None,
            length_mi: None,
            power_capacity: None,
            log_power_capacity: None,
        });
    }

    report
}

fn skip(report: &mut MergeReport, seed: &LineFeature, member_ids: Vec<i64>, reason: SkipReason) {
    warn!(
        owner = %seed.owner,
        voltage_kv = seed.voltage.value(),
        %reason,
        "could not merge line group"
    );
    report.skipped.push(SkippedGroup {
        owner: seed.owner.clone(),
        voltage: seed.voltage,
        member_ids,
        reason,
    });
}
