use headtrack_core::CoreError;

/// Errors returned by pattern configuration and result lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("at least one reference pattern is required")]
    NoPatterns,
    #[error("no labelled observations to average")]
    NoObservations,
    #[error("edge tolerance must be finite and >= 0 (got {0})")]
    InvalidEpsilon(f32),
    #[error("squared edge length {slot} must be finite and > 0 (got {value})")]
    InvalidEdge { slot: usize, value: f32 },
    #[error("pattern slot {slot} out of range (slots={slots})")]
    SlotOutOfRange { slot: usize, slots: usize },
    #[error("triple {index} out of range for slot {slot} (len={len})")]
    TripleOutOfRange { slot: usize, index: usize, len: usize },
    #[error(transparent)]
    Core(#[from] CoreError),
}
