use std::path::Path;

use headtrack_core::CoreError;
use headtrack_pattern::{PatternError, PatternParams};
use serde::{Deserialize, Serialize};

/// Errors produced while loading or validating a configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Sliding-window settings for per-head covariance tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovarianceParams {
    /// Number of recent samples in the window.
    pub window: usize,
    /// Variance reported before two samples have arrived.
    pub initial_variance: f32,
}

impl Default for CovarianceParams {
    fn default() -> Self {
        Self {
            window: 30,
            initial_variance: 1.0,
        }
    }
}

/// Everything the tracker needs: identification and covariance settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub identifier: PatternParams,
    #[serde(default)]
    pub covariance: CovarianceParams,
}

impl TrackerConfig {
    pub fn new(identifier: PatternParams) -> Self {
        Self {
            identifier,
            covariance: CovarianceParams::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.identifier.validate()?;
        if self.covariance.window == 0 {
            return Err(CoreError::ZeroCapacity.into());
        }
        let v = self.covariance.initial_variance;
        if !v.is_finite() || v < 0.0 {
            return Err(CoreError::NonFiniteVariance(v).into());
        }
        Ok(())
    }
}
