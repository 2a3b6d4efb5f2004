//! Streaming 3D covariance over a sliding window of recent samples.
//!
//! Each new sample triggers a full two-pass recompute (means, then centred
//! second moments) over the window. Windows are short, a few dozen frames,
//! so the O(C) cost per sample is acceptable and avoids the drift of running
//! sum updates.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::{CircularWindow, CoreError, Point3D};

/// Symmetric 3x3 covariance, stored as its six distinct entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CovarianceEstimate {
    /// X variance.
    pub sx: f32,
    /// Y variance.
    pub sy: f32,
    /// Z variance.
    pub sz: f32,
    /// XY covariance.
    pub sxy: f32,
    /// XZ covariance.
    pub sxz: f32,
    /// YZ covariance.
    pub syz: f32,
}

impl CovarianceEstimate {
    /// Isotropic estimate with the given variance and zero covariances.
    pub fn isotropic(variance: f32) -> Self {
        Self {
            sx: variance,
            sy: variance,
            sz: variance,
            ..Self::default()
        }
    }

    pub fn to_matrix(&self) -> Matrix3<f32> {
        Matrix3::new(
            self.sx, self.sxy, self.sxz, //
            self.sxy, self.sy, self.syz, //
            self.sxz, self.syz, self.sz,
        )
    }
}

/// Tracks the covariance of the last `capacity` 3D samples of one marker.
#[derive(Clone, Debug)]
pub struct CovarianceTracker {
    x: CircularWindow<f32>,
    y: CircularWindow<f32>,
    z: CircularWindow<f32>,
    estimate: CovarianceEstimate,
    mean: Option<Point3D>,
}

impl CovarianceTracker {
    /// Create a tracker whose variances start at `initial_variance`
    /// (covariances at zero) until two samples have been seen.
    pub fn new(capacity: usize, initial_variance: f32) -> Result<Self, CoreError> {
        if !initial_variance.is_finite() || initial_variance < 0.0 {
            return Err(CoreError::NonFiniteVariance(initial_variance));
        }
        Self::with_initial_estimate(capacity, CovarianceEstimate::isotropic(initial_variance))
    }

    /// Create a tracker seeded with a full initial estimate.
    pub fn with_initial_estimate(
        capacity: usize,
        initial: CovarianceEstimate,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            x: CircularWindow::new(capacity)?,
            y: CircularWindow::new(capacity)?,
            z: CircularWindow::new(capacity)?,
            estimate: initial,
            mean: None,
        })
    }

    pub fn capacity(&self) -> usize {
        self.x.capacity()
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Push a sample and recompute the estimate over the window.
    pub fn add_sample(&mut self, x: f32, y: f32, z: f32) {
        self.x.append(x);
        self.y.append(y);
        self.z.append(z);
        self.recompute();
    }

    pub fn add_point(&mut self, p: &Point3D) {
        self.add_sample(p.x, p.y, p.z);
    }

    /// Snapshot of the current estimate.
    pub fn estimate(&self) -> CovarianceEstimate {
        self.estimate
    }

    pub fn covariance_matrix(&self) -> Matrix3<f32> {
        self.estimate.to_matrix()
    }

    /// Window mean, available once two samples have been seen.
    pub fn mean(&self) -> Option<Point3D> {
        self.mean
    }

    fn recompute(&mut self) {
        let n = self.x.len();
        if n < 2 {
            return;
        }

        let samples = || {
            self.x
                .iter()
                .zip(self.y.iter())
                .zip(self.z.iter())
                .map(|((&x, &y), &z)| (x as f64, y as f64, z as f64))
        };

        let (mut xm, mut ym, mut zm) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (x, y, z) in samples() {
            xm += x;
            ym += y;
            zm += z;
        }
        let nf = n as f64;
        xm /= nf;
        ym /= nf;
        zm /= nf;

        let (mut sx, mut sy, mut sz) = (0.0_f64, 0.0_f64, 0.0_f64);
        let (mut sxy, mut sxz, mut syz) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (x, y, z) in samples() {
            let dx = x - xm;
            let dy = y - ym;
            let dz = z - zm;
            sx += dx * dx;
            sy += dy * dy;
            sz += dz * dz;
            sxy += dx * dy;
            sxz += dx * dz;
            syz += dy * dz;
        }

        // Bessel's correction.
        let denom = (n - 1) as f64;
        self.estimate = CovarianceEstimate {
            sx: (sx / denom) as f32,
            sy: (sy / denom) as f32,
            sz: (sz / denom) as f32,
            sxy: (sxy / denom) as f32,
            sxz: (sxz / denom) as f32,
            syz: (syz / denom) as f32,
        };
        self.mean = Some(Point3D::new(xm as f32, ym as f32, zm as f32));
    }
}
