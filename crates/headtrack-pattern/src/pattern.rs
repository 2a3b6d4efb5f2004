use headtrack_core::Point3D;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::PatternError;

/// Geometric signature of a rigid three-marker body.
///
/// Three squared edge lengths. Edges 0 and 1 share a vertex; edge 2 joins
/// their two other endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePattern {
    pub edges_sq: [f32; 3],
}

impl ReferencePattern {
    pub fn new(edges_sq: [f32; 3]) -> Result<Self, PatternError> {
        let pattern = Self { edges_sq };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Build from plain (non-squared) edge lengths.
    pub fn from_lengths(lengths: [f32; 3]) -> Result<Self, PatternError> {
        Self::new(lengths.map(|l| l * l))
    }

    /// Measure the pattern from one labelled observation.
    ///
    /// Edges are `(p0, p1)`, `(p0, p2)` and `(p1, p2)`.
    pub fn from_points(p0: &Point3D, p1: &Point3D, p2: &Point3D) -> Result<Self, PatternError> {
        Self::new([
            (p1 - p0).norm_squared(),
            (p2 - p0).norm_squared(),
            (p2 - p1).norm_squared(),
        ])
    }

    /// Average squared edges over several labelled observations of the same
    /// body.
    pub fn average(observations: &[[Point3D; 3]]) -> Result<Self, PatternError> {
        if observations.is_empty() {
            return Err(PatternError::NoObservations);
        }
        let sum = observations
            .iter()
            .fold(Vector3::<f64>::zeros(), |acc, [p0, p1, p2]| {
                acc + Vector3::new(
                    (p1 - p0).norm_squared() as f64,
                    (p2 - p0).norm_squared() as f64,
                    (p2 - p1).norm_squared() as f64,
                )
            });
        let mean = sum / observations.len() as f64;
        Self::new([mean.x as f32, mean.y as f32, mean.z as f32])
    }

    pub fn edge_lengths(&self) -> [f32; 3] {
        self.edges_sq.map(f32::sqrt)
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        for (slot, &value) in self.edges_sq.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(PatternError::InvalidEdge { slot, value });
            }
        }
        Ok(())
    }
}
