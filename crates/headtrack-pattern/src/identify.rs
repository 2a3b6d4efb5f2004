//! Candidate edge enumeration and triangle closure.
//!
//! 1. For every unordered pair `(i, j)`, `i < j`, measure the distance and
//!    file the pair under every `(pattern, edge)` bucket whose target length
//!    it matches within `epsilon`. A pair may land in several buckets.
//! 2. For each pattern, combine edges from buckets 0 and 1 that share exactly
//!    one endpoint, then accept every bucket-2 edge joining the two remaining
//!    endpoints (in either order).
//!
//! Lengths, not squared lengths, are compared so that `epsilon` is in capture
//! units regardless of pattern scale.
//!
//! When target edges are equal the closure finds the same triangle once per
//! valid edge assignment. With `merge_relabelings` (the default) only the
//! first assignment of each vertex set is kept; distinct vertex sets are
//! never merged, so genuine ambiguity survives.

use std::collections::HashSet;

use headtrack_core::FrameView;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{IdentifiedPatternSet, IdentifiedTriple, PatternError, ReferencePattern};

/// Default absolute edge-length tolerance, in capture units.
pub const DEFAULT_EPSILON: f32 = 10.0;

fn default_epsilon() -> f32 {
    DEFAULT_EPSILON
}

fn default_true() -> bool {
    true
}

/// Edge-length match. An exact match is accepted even with zero tolerance.
#[inline]
fn within_tolerance(target: f32, observed: f32, eps: f32) -> bool {
    let diff = (target - observed).abs();
    diff < eps || diff == 0.0
}

/// Identification settings: tolerance plus one reference pattern per slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    /// Absolute tolerance on edge length.
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
    /// Reference patterns; output slot `n` belongs to `patterns[n]`.
    pub patterns: Vec<ReferencePattern>,
    /// Keep one triple per vertex set and slot.
    #[serde(default = "default_true")]
    pub merge_relabelings: bool,
}

impl PatternParams {
    pub fn new(patterns: Vec<ReferencePattern>) -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            patterns,
            merge_relabelings: true,
        }
    }

    /// The usual two-subject setup: head A in slot 0, head B in slot 1.
    pub fn two_heads(head_a: ReferencePattern, head_b: ReferencePattern) -> Self {
        Self::new(vec![head_a, head_b])
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_merge_relabelings(mut self, merge: bool) -> Self {
        self.merge_relabelings = merge;
        self
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(PatternError::InvalidEpsilon(self.epsilon));
        }
        if self.patterns.is_empty() {
            return Err(PatternError::NoPatterns);
        }
        for pattern in &self.patterns {
            pattern.validate()?;
        }
        Ok(())
    }
}

/// A point pair whose length matched one target edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateEdge {
    pub i: usize,
    pub j: usize,
    /// Observed distance between the two points.
    pub length: f32,
}

/// Candidate edges for one pattern, one bucket per target edge.
pub type EdgeBuckets = [Vec<CandidateEdge>; 3];

/// Finds all point triples matching each configured reference pattern.
#[derive(Clone, Debug)]
pub struct PatternIdentifier {
    params: PatternParams,
    /// Target edge lengths, `sqrt` of the configured squared lengths.
    targets: Vec<[f32; 3]>,
}

impl PatternIdentifier {
    pub fn new(params: PatternParams) -> Result<Self, PatternError> {
        params.validate()?;
        let targets = params.patterns.iter().map(|p| p.edge_lengths()).collect();
        Ok(Self { params, targets })
    }

    pub fn params(&self) -> &PatternParams {
        &self.params
    }

    pub fn num_patterns(&self) -> usize {
        self.targets.len()
    }

    /// Enumerate candidate edges for every pattern.
    ///
    /// Frames with fewer than two points yield empty buckets.
    pub fn candidate_edges(&self, frame: &FrameView<'_>) -> Vec<EdgeBuckets> {
        let eps = self.params.epsilon;
        let mut buckets: Vec<EdgeBuckets> =
            self.targets.iter().map(|_| Default::default()).collect();

        let points = frame.points;
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                let observed = (b - a).norm_squared().sqrt();
                for (pattern, target) in self.targets.iter().enumerate() {
                    for (edge, &length) in target.iter().enumerate() {
                        if within_tolerance(length, observed, eps) {
                            buckets[pattern][edge].push(CandidateEdge {
                                i,
                                j,
                                length: observed,
                            });
                        }
                    }
                }
            }
        }
        buckets
    }

    /// Identify every pattern in `frame`, replacing the contents of `out`.
    ///
    /// `out` is resized to one slot per configured pattern.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, out), fields(points = frame.len()))
    )]
    pub fn identify_into(&self, frame: &FrameView<'_>, out: &mut IdentifiedPatternSet) {
        out.reset(self.targets.len());
        if frame.len() < 3 {
            debug!("frame with {} points, nothing to identify", frame.len());
            return;
        }

        let buckets = self.candidate_edges(frame);
        let mut seen: HashSet<[usize; 3]> = HashSet::new();
        for (slot, (edges, triples)) in buckets.iter().zip(out.slots_mut()).enumerate() {
            seen.clear();
            close_triangles(edges, |triple| {
                if self.params.merge_relabelings {
                    let mut key = triple.indices();
                    key.sort_unstable();
                    if !seen.insert(key) {
                        return;
                    }
                }
                triples.push(triple);
            });
            let found = triples.len();
            debug!(
                "pattern {slot}: edges [{}, {}, {}] -> {found} triples",
                edges[0].len(),
                edges[1].len(),
                edges[2].len()
            );
            if found > 1 {
                warn!("pattern {slot}: {found} ambiguous matches");
            }
        }
    }

    /// Identify every pattern in `frame` into a fresh set.
    pub fn identify(&self, frame: &FrameView<'_>) -> IdentifiedPatternSet {
        let mut out = IdentifiedPatternSet::new(self.targets.len());
        self.identify_into(frame, &mut out);
        out
    }
}

/// Close triangles across the three edge buckets of one pattern.
///
/// Exactly one of the four endpoint-sharing cases is taken per edge pair,
/// checked in the order `a1 == a2`, `a1 == b2`, `b1 == a2`, `b1 == b2`.
/// Every closing edge found is emitted; nothing is deduplicated.
fn close_triangles(edges: &EdgeBuckets, mut emit: impl FnMut(IdentifiedTriple)) {
    let [e1, e2, e3] = edges;
    for c1 in e1 {
        let (a1, b1) = (c1.i, c1.j);
        for c2 in e2 {
            let (a2, b2) = (c2.i, c2.j);
            // (shared vertex, outer end of edge 0, outer end of edge 1)
            let (shared, u, v) = if a1 == a2 {
                (a1, b1, b2)
            } else if a1 == b2 {
                (a1, b1, a2)
            } else if b1 == a2 {
                (b1, a1, b2)
            } else if b1 == b2 {
                (b1, a1, a2)
            } else {
                continue;
            };

            for c3 in e3 {
                let (a3, b3) = (c3.i, c3.j);
                if (u == a3 && v == b3) || (u == b3 && v == a3) {
                    emit(IdentifiedTriple::new(shared, a3, b3));
                }
            }
        }
    }
}
