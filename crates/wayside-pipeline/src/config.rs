//! Pipeline configuration.

use std::time::Duration;

use wayside_enhancer::ArbiterConfig;
use wayside_spatial::{
    PostprocessConfig, SpatialConfig, DEFAULT_MAX_DIMENSION, MAX_NARRATION_WORDS,
};

use crate::error::{PipelineError, PipelineResult};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Side and distance thresholds
    pub spatial: SpatialConfig,
    /// Word budget for spoken narration, at most twelve
    pub max_words: usize,
    /// Deadline for the remote enhancer
    pub enhance_timeout: Duration,
    /// Longest side of a processed frame
    pub max_dimension: u32,
    /// Detector scores below this are dropped when loading scene files
    pub min_confidence: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            spatial: SpatialConfig::default(),
            max_words: MAX_NARRATION_WORDS,
            enhance_timeout: Duration::from_secs(10),
            max_dimension: DEFAULT_MAX_DIMENSION,
            min_confidence: 0.5,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            spatial: SpatialConfig {
                center_band: env_or("WAYSIDE_CENTER_BAND", defaults.spatial.center_band),
                near_ratio: env_or("WAYSIDE_NEAR_RATIO", defaults.spatial.near_ratio),
                far_ratio: env_or("WAYSIDE_FAR_RATIO", defaults.spatial.far_ratio),
            },
            max_words: env_or("WAYSIDE_MAX_WORDS", defaults.max_words),
            enhance_timeout: Duration::from_secs(env_or(
                "WAYSIDE_ENHANCE_TIMEOUT_SECS",
                defaults.enhance_timeout.as_secs(),
            )),
            max_dimension: env_or("WAYSIDE_MAX_DIMENSION", defaults.max_dimension),
            min_confidence: env_or("WAYSIDE_MIN_CONFIDENCE", defaults.min_confidence),
        }
    }

    /// Reject settings the pipeline cannot honor.
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.spatial.is_valid() {
            return Err(PipelineError::config(format!(
                "spatial thresholds out of range: {:?}",
                self.spatial
            )));
        }
        if self.max_words == 0 || self.max_words > MAX_NARRATION_WORDS {
            return Err(PipelineError::config(format!(
                "max_words must be between 1 and {}, got {}",
                MAX_NARRATION_WORDS, self.max_words
            )));
        }
        if self.enhance_timeout.is_zero() {
            return Err(PipelineError::config("enhance_timeout must be positive"));
        }
        if self.max_dimension == 0 {
            return Err(PipelineError::config("max_dimension must be positive"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(PipelineError::config(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    pub fn arbiter(&self) -> ArbiterConfig {
        ArbiterConfig {
            deadline: self.enhance_timeout,
            max_words: self.max_words,
            ..ArbiterConfig::default()
        }
    }

    pub fn postprocess(&self) -> PostprocessConfig {
        PostprocessConfig {
            min_confidence: self.min_confidence,
            ..PostprocessConfig::default()
        }
    }
}
