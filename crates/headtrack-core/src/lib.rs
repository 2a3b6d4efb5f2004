//! Core types and utilities for marker-based head tracking.
//!
//! This crate is intentionally small: 3D point frames, a fixed-capacity
//! sliding window and a streaming covariance estimator. It knows nothing
//! about reference patterns or how frames are captured.

mod covariance;
mod error;
mod frame;
mod logger;
mod window;

pub use covariance::{CovarianceEstimate, CovarianceTracker};
pub use error::CoreError;
pub use frame::{remove_duplicate_points, FrameView, Point3D, PointFrame};
pub use window::CircularWindow;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, log_frame, set_log_frame};
