//! Remote enhancer collaborator interface.

use std::sync::Arc;

use async_trait::async_trait;
use wayside_models::Detection;
use wayside_spatial::Frame;

use crate::error::EnhancerResult;

/// Detections included in an enhancement request.
pub const MAX_REQUEST_DETECTIONS: usize = 10;
/// Text spans included in an enhancement request.
pub const MAX_REQUEST_TEXT_SPANS: usize = 5;

/// What the remote enhancer is given to describe.
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    pub frame: Arc<Frame>,
    /// `"<label> (<side>, <distance>, <confidence>%), "` per detection
    pub detection_summary: String,
    /// Text spans joined by `", "`
    pub text_summary: String,
}

impl EnhancementRequest {
    /// Summarize the leading detections and text spans of a ranked scene.
    pub fn from_scene(
        frame: Arc<Frame>,
        ranked: &[Detection],
        text_spans: &[String],
        max_detections: usize,
        max_text_spans: usize,
    ) -> Self {
        Self {
            frame,
            detection_summary: detection_summary(ranked, max_detections),
            text_summary: text_summary(text_spans, max_text_spans),
        }
    }
}

/// Render detections as comma-terminated prompt fragments.
pub fn detection_summary(ranked: &[Detection], limit: usize) -> String {
    ranked
        .iter()
        .take(limit)
        .map(|d| {
            format!(
                "{} ({}, {}, {:.0}%), ",
                d.label,
                d.side(),
                d.distance(),
                // halves round up, not to even
                (d.confidence * 100.0).round()
            )
        })
        .collect()
}

pub fn text_summary(text_spans: &[String], limit: usize) -> String {
    text_spans
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A service that can produce a richer narration than the local composer.
///
/// Results are best effort: the arbiter bounds every call by a deadline and
/// discards anything that is late, failed or empty.
#[async_trait]
pub trait RemoteEnhancer: Send + Sync {
    /// Whether the enhancer is configured well enough to be called.
    fn is_available(&self) -> bool;

    /// Produce a narration for the request. The raw text may still be wrapped
    /// in a JSON payload or code fence.
    async fn enhance(&self, request: EnhancementRequest) -> EnhancerResult<String>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
