//! Collaborator traits for the detector and the text recognizer.
//!
//! The models themselves live outside this crate; these traits give the
//! pipeline a uniform, swappable interface to them.

use async_trait::async_trait;
use tracing::debug;
use wayside_models::{Detection, TextObservation};

use crate::error::SpatialResult;
use crate::frame::Frame;

/// Object detection provider.
///
/// Implementations return labeled, scored boxes in the frame's pixel space
/// and must not return degenerate boxes.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> SpatialResult<Vec<Detection>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Text recognition provider.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, frame: &Frame) -> SpatialResult<Vec<TextObservation>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Sign words that mark text as navigation-relevant.
pub const NAVIGATION_KEYWORDS: &[&str] = &[
    "STOP", "WALK", "DON'T WALK", "CROSS", "DETOUR", "CLOSED", "EXIT", "ENTRANCE",
];

/// Text at most this long is kept even without a keyword.
pub const SHORT_TEXT_MAX_CHARS: usize = 20;

/// Check whether recognized text is worth narrating.
pub fn is_navigation_text(text: &str) -> bool {
    let upper = text.to_uppercase();
    NAVIGATION_KEYWORDS.iter().any(|k| upper.contains(k))
        || upper.chars().count() <= SHORT_TEXT_MAX_CHARS
}

/// Wraps a recognizer and keeps only trimmed, non-empty navigation text.
pub struct NavigationTextFilter<R> {
    inner: R,
}

impl<R: TextRecognizer> NavigationTextFilter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: TextRecognizer> TextRecognizer for NavigationTextFilter<R> {
    async fn recognize(&self, frame: &Frame) -> SpatialResult<Vec<TextObservation>> {
        let raw = self.inner.recognize(frame).await?;
        let total = raw.len();

        let kept: Vec<TextObservation> = raw
            .into_iter()
            .filter_map(|obs| {
                let text = obs.text.trim();
                if text.is_empty() || !is_navigation_text(text) {
                    return None;
                }
                Some(TextObservation::new(text, obs.bbox))
            })
            .collect();

        debug!(
            provider = self.inner.name(),
            total,
            kept = kept.len(),
            "Filtered recognized text"
        );
        Ok(kept)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
