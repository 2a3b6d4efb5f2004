/// Errors returned by the core containers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("window capacity must be >= 1")]
    ZeroCapacity,
    #[error("index {index} out of range (len={len})")]
    OutOfRange { index: usize, len: usize },
    #[error("flat coordinate buffer length {len} is not a multiple of 3")]
    InvalidFlatLength { len: usize },
    #[error("initial variance must be finite and >= 0 (got {0})")]
    NonFiniteVariance(f32),
    #[error("duplicate tolerance must be finite and >= 0 (got {0})")]
    InvalidTolerance(f32),
}
