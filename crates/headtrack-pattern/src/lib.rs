//! Re-identification of rigid three-marker patterns in unordered point clouds.
//!
//! Design idea:
//! - Each tracked rigid body (a head) carries three markers forming a known
//!   triangle, described by a [`ReferencePattern`] of three squared edge
//!   lengths.
//! - Marker order changes from frame to frame, so identity is re-derived on
//!   every frame: collect all point pairs whose length matches each target
//!   edge, then close triangles across the three edge buckets.
//! - Every consistent triangle is reported. Ambiguous matches are kept so the
//!   caller can resolve them, e.g. by continuity with the previous frame.

mod error;
mod identify;
mod pattern;
mod set;

pub use error::PatternError;
pub use identify::{CandidateEdge, EdgeBuckets, PatternIdentifier, PatternParams, DEFAULT_EPSILON};
pub use pattern::ReferencePattern;
pub use set::{IdentifiedPatternSet, IdentifiedTriple};
