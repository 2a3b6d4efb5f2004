//! High-level facade for the `headtrack-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core containers and the pattern identifier
//! - a JSON configuration ([`TrackerConfig`]) covering every tunable
//! - [`HeadTracker`], which runs the per-frame control flow: identify heads,
//!   pick one match per head by continuity, and update that head's noise
//!   statistics
//!
//! ## Quickstart
//!
//! ```
//! use headtrack::{HeadTracker, TrackerConfig};
//! use headtrack::core::Point3D;
//! use headtrack::pattern::{PatternParams, ReferencePattern};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let head = ReferencePattern::from_lengths([100.0, 100.0, 141.42])?;
//! let config = TrackerConfig::new(PatternParams::new(vec![head]));
//! let mut tracker = HeadTracker::new(&config)?;
//!
//! let frame = vec![
//!     Point3D::new(0.0, 0.0, 0.0),
//!     Point3D::new(100.0, 0.0, 0.0),
//!     Point3D::new(0.0, 100.0, 0.0),
//! ];
//! let report = tracker.process(&frame)?;
//! assert_eq!(report.heads[0].triples.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `headtrack::core`: points, frames, ring buffer, covariance tracker.
//! - `headtrack::pattern`: reference patterns and triangle identification.

pub use headtrack_core as core;
pub use headtrack_pattern as pattern;

mod config;
mod tracker;

pub use config::{ConfigError, CovarianceParams, TrackerConfig};
pub use tracker::{FrameReport, HeadReport, HeadTracker};
