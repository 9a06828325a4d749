//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scene file not found: {0}")]
    SceneNotFound(PathBuf),

    #[error("Invalid scene file: {0}")]
    SceneParse(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }
}
