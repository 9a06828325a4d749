//! Enhancement arbiter.
//!
//! Decides between the remote enhancer and the local composer:
//!
//! ```text
//! CHECK_AVAILABLE ──unavailable──────────────────────────┐
//!       │                                                 ▼
//!    CALLING ──timeout / error / empty──────────▶ LOCAL_FALLBACK ──▶ DONE
//!       │
//!    SUCCESS ─────────────────────────────────────────────────────▶ DONE
//! ```
//!
//! The remote call runs as its own task and is joined with a deadline. A
//! late call is not cancelled; its result is dropped when it finishes.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use wayside_models::{Detection, NarrationSource};
use wayside_spatial::{compose_within, Frame, MAX_NARRATION_WORDS};

use crate::enhancer::{
    EnhancementRequest, RemoteEnhancer, MAX_REQUEST_DETECTIONS, MAX_REQUEST_TEXT_SPANS,
};
use crate::error::EnhancerError;
use crate::payload::extract_narration;

/// Arbiter limits.
#[derive(Debug, Clone)]
pub struct ArbiterConfig {
    /// Longest time to wait for the remote enhancer
    pub deadline: Duration,
    /// Detections summarized in the request
    pub max_detections: usize,
    /// Text spans summarized in the request
    pub max_text_spans: usize,
    /// Word budget applied to both branches
    pub max_words: usize,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(10),
            max_detections: MAX_REQUEST_DETECTIONS,
            max_text_spans: MAX_REQUEST_TEXT_SPANS,
            max_words: MAX_NARRATION_WORDS,
        }
    }
}

/// Why the local composer was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No enhancer was supplied.
    NotConfigured,
    /// The enhancer reported itself unavailable.
    Unavailable,
    /// The deadline passed before the enhancer answered.
    Timeout,
    /// The enhancer answered with nothing usable.
    Empty,
    /// The enhancer failed, or its task panicked.
    Error(String),
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NotConfigured => "not_configured",
            FallbackReason::Unavailable => "unavailable",
            FallbackReason::Timeout => "timeout",
            FallbackReason::Empty => "empty",
            FallbackReason::Error(_) => "error",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Error(detail) => write!(f, "error: {}", detail),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl From<EnhancerError> for FallbackReason {
    fn from(err: EnhancerError) -> Self {
        match err {
            EnhancerError::Timeout(_) => FallbackReason::Timeout,
            EnhancerError::EmptyPayload => FallbackReason::Empty,
            EnhancerError::NotConfigured(_) => FallbackReason::Unavailable,
            other => FallbackReason::Error(other.to_string()),
        }
    }
}

/// The narration chosen by the arbiter and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterOutcome {
    pub narration: String,
    pub source: NarrationSource,
    /// Set when `source` is `Local`
    pub fallback: Option<FallbackReason>,
    /// Time spent waiting on the enhancer
    pub waited: Duration,
}

/// Arbitrates between the remote enhancer and the local composer.
#[derive(Debug, Clone, Default)]
pub struct NarrationArbiter {
    config: ArbiterConfig,
}

impl NarrationArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Produce a narration; never fails and never waits past the deadline.
    pub async fn narrate(
        &self,
        frame: Arc<Frame>,
        ranked: &[Detection],
        text_spans: &[String],
        enhancer: Option<Arc<dyn RemoteEnhancer>>,
    ) -> String {
        self.narrate_with_outcome(frame, ranked, text_spans, enhancer)
            .await
            .narration
    }

    /// Like [`narrate`](Self::narrate), also reporting which branch was taken.
    pub async fn narrate_with_outcome(
        &self,
        frame: Arc<Frame>,
        ranked: &[Detection],
        text_spans: &[String],
        enhancer: Option<Arc<dyn RemoteEnhancer>>,
    ) -> ArbiterOutcome {
        let Some(enhancer) = enhancer else {
            return self.local(ranked, text_spans, FallbackReason::NotConfigured, Duration::ZERO);
        };

        if !enhancer.is_available() {
            debug!(enhancer = enhancer.name(), "Enhancer unavailable");
            return self.local(ranked, text_spans, FallbackReason::Unavailable, Duration::ZERO);
        }

        let request = EnhancementRequest::from_scene(
            frame,
            ranked,
            text_spans,
            self.config.max_detections,
            self.config.max_text_spans,
        );
        let name = enhancer.name();
        let started = Instant::now();

        let task = tokio::spawn(async move { enhancer.enhance(request).await });

        let attempt = match tokio::time::timeout(self.config.deadline, task).await {
            Ok(Ok(Ok(raw))) => extract_narration(&raw, self.config.max_words),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(join_err)) => Err(EnhancerError::transport(format!(
                "enhancer task failed: {}",
                join_err
            ))),
            Err(_) => Err(EnhancerError::Timeout(self.config.deadline)),
        };
        let waited = started.elapsed();
        metrics::histogram!("wayside_enhancement_seconds").record(waited.as_secs_f64());

        match attempt {
            Ok(narration) => {
                info!(
                    enhancer = name,
                    waited_ms = waited.as_millis() as u64,
                    "Using enhanced narration"
                );
                metrics::counter!("wayside_enhancement_total", "outcome" => "enhanced")
                    .increment(1);
                ArbiterOutcome {
                    narration,
                    source: NarrationSource::Enhanced,
                    fallback: None,
                    waited,
                }
            }
            Err(e) => {
                warn!(
                    enhancer = name,
                    error = %e,
                    waited_ms = waited.as_millis() as u64,
                    "Enhancement failed, using local narration"
                );
                self.local(ranked, text_spans, FallbackReason::from(e), waited)
            }
        }
    }

    fn local(
        &self,
        ranked: &[Detection],
        text_spans: &[String],
        reason: FallbackReason,
        waited: Duration,
    ) -> ArbiterOutcome {
        metrics::counter!("wayside_enhancement_total", "outcome" => reason.as_str())
            .increment(1);
        ArbiterOutcome {
            narration: compose_within(ranked, text_spans, self.config.max_words),
            source: NarrationSource::Local,
            fallback: Some(reason),
            waited,
        }
    }
}
