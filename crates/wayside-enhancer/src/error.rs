//! Enhancer error types.

use std::time::Duration;
use thiserror::Error;

pub type EnhancerResult<T> = Result<T, EnhancerError>;

/// Why a remote enhancement attempt produced no narration.
///
/// Every variant resolves to the local fallback; none is shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnhancerError {
    #[error("Enhancer not configured: {0}")]
    NotConfigured(String),

    #[error("Enhancer timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Frame encoding failed: {0}")]
    Encoding(String),
}

impl EnhancerError {
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn blocked(msg: impl Into<String>) -> Self {
        Self::Blocked(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Check if another model or attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EnhancerError::Timeout(_)
                | EnhancerError::Transport(_)
                | EnhancerError::EmptyPayload
                | EnhancerError::MalformedPayload(_)
        )
    }
}
