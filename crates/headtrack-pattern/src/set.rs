use headtrack_core::{FrameView, Point3D};
use serde::{Deserialize, Serialize};

use crate::PatternError;

/// Three point indices that jointly satisfy a reference pattern.
///
/// `i` is the vertex shared by edges 0 and 1; `(j, k)` is the edge-2 pair in
/// the order it was enumerated. Indices refer to the frame the triple was
/// found in and are meaningless for any other frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifiedTriple {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl IdentifiedTriple {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.i, self.j, self.k]
    }

    /// Arithmetic mean of the three points.
    pub fn centroid(&self, frame: &FrameView<'_>) -> Result<Point3D, PatternError> {
        let a = frame.point(self.i)?;
        let b = frame.point(self.j)?;
        let c = frame.point(self.k)?;
        Ok(Point3D::from((a.coords + b.coords + c.coords) / 3.0))
    }
}

/// Accepted triples for one frame, one slot per reference pattern.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPatternSet {
    slots: Vec<Vec<IdentifiedTriple>>,
}

impl IdentifiedPatternSet {
    pub fn new(num_slots: usize) -> Self {
        Self {
            slots: vec![Vec::new(); num_slots],
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Empty every slot, keeping the slot count.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Resize to `num_slots` slots and clear them.
    pub(crate) fn reset(&mut self, num_slots: usize) {
        self.slots.resize_with(num_slots, Vec::new);
        self.clear();
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Vec<IdentifiedTriple>] {
        &mut self.slots
    }

    pub fn add(&mut self, slot: usize, triple: IdentifiedTriple) -> Result<(), PatternError> {
        let slots = self.slots.len();
        self.slots
            .get_mut(slot)
            .ok_or(PatternError::SlotOutOfRange { slot, slots })?
            .push(triple);
        Ok(())
    }

    pub fn count(&self, slot: usize) -> Result<usize, PatternError> {
        Ok(self.slot(slot)?.len())
    }

    /// All triples accepted for `slot`, in discovery order.
    pub fn slot(&self, slot: usize) -> Result<&[IdentifiedTriple], PatternError> {
        self.slots
            .get(slot)
            .map(Vec::as_slice)
            .ok_or(PatternError::SlotOutOfRange {
                slot,
                slots: self.slots.len(),
            })
    }

    pub fn get(&self, slot: usize, index: usize) -> Result<&IdentifiedTriple, PatternError> {
        let triples = self.slot(slot)?;
        triples.get(index).ok_or(PatternError::TripleOutOfRange {
            slot,
            index,
            len: triples.len(),
        })
    }

    /// Centroid of triple `index` in `slot`, evaluated on `frame`.
    pub fn centroid(
        &self,
        slot: usize,
        index: usize,
        frame: &FrameView<'_>,
    ) -> Result<Point3D, PatternError> {
        self.get(slot, index)?.centroid(frame)
    }

    /// Triple in `slot` whose centroid lies closest to `previous`.
    ///
    /// Returns `(index, distance)`. Without a previous position the first
    /// triple wins with distance 0. `None` when the slot is empty.
    pub fn nearest_to(
        &self,
        slot: usize,
        frame: &FrameView<'_>,
        previous: Option<&Point3D>,
    ) -> Result<Option<(usize, f32)>, PatternError> {
        let triples = self.slot(slot)?;
        let Some(previous) = previous else {
            return Ok((!triples.is_empty()).then_some((0, 0.0)));
        };

        let mut best: Option<(usize, f32)> = None;
        for (idx, triple) in triples.iter().enumerate() {
            let dist = (triple.centroid(frame)? - previous).norm();
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        Ok(best)
    }

    /// Total number of triples across all slots.
    pub fn total(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[IdentifiedTriple]> {
        self.slots.iter().map(Vec::as_slice)
    }
}
