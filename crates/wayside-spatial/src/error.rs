//! Error types for spatial analysis and frame handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors raised at the collaborator boundary.
///
/// The classifier, ranker and composer never fail; these errors come from
/// loading frames and from detector / recognizer implementations.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Frame not found: {0}")]
    FrameNotFound(PathBuf),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Object detection failed: {0}")]
    DetectionFailed(String),

    #[error("Text recognition failed: {0}")]
    RecognitionFailed(String),
}

impl SpatialError {
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame(message.into())
    }

    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    pub fn recognition_failed(message: impl Into<String>) -> Self {
        Self::RecognitionFailed(message.into())
    }
}
