use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A marker position in capture units.
pub type Point3D = Point3<f32>;

/// Borrowed view over one frame of marker positions.
///
/// Indices are positions in this frame only; they carry no marker identity
/// across frames.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub points: &'a [Point3D],
}

/// Owned frame of marker positions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointFrame {
    pub points: Vec<Point3D>,
}

impl PointFrame {
    pub fn new(points: Vec<Point3D>) -> Self {
        Self { points }
    }

    /// Build a frame from an interleaved `x, y, z, x, y, z, ...` buffer.
    pub fn from_flat(coords: Vec<f32>) -> Result<Self, CoreError> {
        if coords.len() % 3 != 0 {
            return Err(CoreError::InvalidFlatLength { len: coords.len() });
        }
        let points = coords
            .chunks_exact(3)
            .map(|c| Point3D::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { points })
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            points: &self.points,
        }
    }
}

impl<'a> FrameView<'a> {
    pub fn new(points: &'a [Point3D]) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounds-checked point access.
    #[inline]
    pub fn point(&self, index: usize) -> Result<&'a Point3D, CoreError> {
        self.points.get(index).ok_or(CoreError::OutOfRange {
            index,
            len: self.points.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Point3D> {
        self.points.iter()
    }

    /// Squared Euclidean distance between points `i` and `j`.
    #[inline]
    pub fn squared_distance(&self, i: usize, j: usize) -> Result<f32, CoreError> {
        Ok((self.point(j)? - self.point(i)?).norm_squared())
    }
}

impl<'a> From<&'a [Point3D]> for FrameView<'a> {
    fn from(points: &'a [Point3D]) -> Self {
        Self { points }
    }
}

/// Drop points lying within `tolerance` of an earlier kept point.
///
/// Capture systems occasionally report the same marker twice; the first
/// occurrence wins and the order of kept points is preserved. A negative or
/// non-finite `tolerance` is rejected.
pub fn remove_duplicate_points(
    points: &[Point3D],
    tolerance: f32,
) -> Result<Vec<Point3D>, CoreError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(CoreError::InvalidTolerance(tolerance));
    }
    let tol_sq = tolerance * tolerance;
    let mut kept: Vec<Point3D> = Vec::with_capacity(points.len());
    for p in points {
        let duplicate = kept.iter().any(|q| (p - q).norm_squared() <= tol_sq);
        if !duplicate {
            kept.push(*p);
        }
    }
    if kept.len() < points.len() {
        log::debug!(
            "removed {} duplicate points (tolerance {tolerance})",
            points.len() - kept.len()
        );
    }
    Ok(kept)
}
