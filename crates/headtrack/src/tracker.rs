//! Per-frame control flow over a stream of point clouds.
//!
//! For every frame: identify all candidate heads, choose one triple per head
//! by proximity to that head's previous centroid, and push the chosen
//! centroid into the head's covariance window. Frames are processed strictly
//! in order; nothing is retained from a frame except centroids.

use headtrack_core::{
    set_log_frame, CovarianceEstimate, CovarianceTracker, FrameView, Point3D,
};
use headtrack_pattern::{
    IdentifiedPatternSet, IdentifiedTriple, PatternError, PatternIdentifier,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ConfigError, TrackerConfig};

/// Outcome for one head in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadReport {
    pub slot: usize,
    /// Every triple accepted for this head, ambiguity included.
    pub triples: Vec<IdentifiedTriple>,
    /// Index into `triples` of the one used for tracking.
    pub selected: Option<usize>,
    /// Centroid of the selected triple.
    pub centroid: Option<Point3D>,
    /// Distance from the previous centroid, when there was one.
    pub displacement: Option<f32>,
    pub covariance: CovarianceEstimate,
    /// Samples currently in the covariance window.
    pub window_len: usize,
}

/// Outcome of one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: usize,
    pub num_points: usize,
    pub heads: Vec<HeadReport>,
}

#[derive(Clone, Debug)]
struct HeadState {
    previous: Option<Point3D>,
    covariance: CovarianceTracker,
}

/// Stateful frame-by-frame head tracker.
#[derive(Clone, Debug)]
pub struct HeadTracker {
    identifier: PatternIdentifier,
    matches: IdentifiedPatternSet,
    heads: Vec<HeadState>,
    window: usize,
    initial_variance: f32,
    frames_seen: usize,
}

impl HeadTracker {
    pub fn new(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let identifier = PatternIdentifier::new(config.identifier.clone())?;
        let num = identifier.num_patterns();
        let mut tracker = Self {
            identifier,
            matches: IdentifiedPatternSet::new(num),
            heads: Vec::with_capacity(num),
            window: config.covariance.window,
            initial_variance: config.covariance.initial_variance,
            frames_seen: 0,
        };
        tracker.reset()?;
        info!(
            "head tracker ready: {num} patterns, epsilon {}, window {}",
            config.identifier.epsilon, config.covariance.window
        );
        Ok(tracker)
    }

    pub fn identifier(&self) -> &PatternIdentifier {
        &self.identifier
    }

    /// Matches from the most recent frame.
    pub fn matches(&self) -> &IdentifiedPatternSet {
        &self.matches
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Snapshot of one head's covariance estimate.
    pub fn covariance(&self, slot: usize) -> Result<CovarianceEstimate, PatternError> {
        self.heads
            .get(slot)
            .map(|h| h.covariance.estimate())
            .ok_or(PatternError::SlotOutOfRange {
                slot,
                slots: self.heads.len(),
            })
    }

    /// Forget all history: previous centroids and covariance windows.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.heads = (0..self.identifier.num_patterns())
            .map(|_| {
                Ok(HeadState {
                    previous: None,
                    covariance: CovarianceTracker::new(self.window, self.initial_variance)?,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        self.frames_seen = 0;
        Ok(())
    }

    /// Process the next frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, points),
            fields(frame = self.frames_seen, points = points.len())
        )
    )]
    pub fn process(&mut self, points: &[Point3D]) -> Result<FrameReport, PatternError> {
        set_log_frame(Some(self.frames_seen));
        let result = self.process_frame(points);
        set_log_frame(None);
        result
    }

    fn process_frame(&mut self, points: &[Point3D]) -> Result<FrameReport, PatternError> {
        let frame = FrameView::new(points);
        self.identifier.identify_into(&frame, &mut self.matches);

        let mut heads = Vec::with_capacity(self.heads.len());
        for (slot, head) in self.heads.iter_mut().enumerate() {
            let triples = self.matches.slot(slot)?.to_vec();
            let nearest = self
                .matches
                .nearest_to(slot, &frame, head.previous.as_ref())?;

            let mut centroid = None;
            let mut displacement = None;
            if let Some((idx, _)) = nearest {
                let c = self.matches.centroid(slot, idx, &frame)?;
                displacement = head.previous.map(|p| (c - p).norm());
                head.covariance.add_point(&c);
                head.previous = Some(c);
                centroid = Some(c);
            } else {
                debug!("frame {}: head {slot} not found", self.frames_seen);
            }

            heads.push(HeadReport {
                slot,
                triples,
                selected: nearest.map(|(idx, _)| idx),
                centroid,
                displacement,
                covariance: head.covariance.estimate(),
                window_len: head.covariance.len(),
            });
        }

        let report = FrameReport {
            frame: self.frames_seen,
            num_points: points.len(),
            heads,
        };
        self.frames_seen += 1;
        Ok(report)
    }
}
