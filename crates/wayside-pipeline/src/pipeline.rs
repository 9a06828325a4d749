//! Pipeline façade.
//!
//! Sequences one frame through detection, text recognition, classification,
//! ranking, narration and summary. Collaborator failures degrade to an empty
//! input for that stage; `process` itself never fails.

use std::sync::Arc;

use tracing::Instrument;
use wayside_enhancer::{NarrationArbiter, RemoteEnhancer};
use wayside_models::{Annotation, Distance, NarrationResult};
use wayside_spatial::{classify, rank, summarize, Frame, ObjectDetector, TextRecognizer};

use crate::config::PipelineConfig;
use crate::logging::{Collaborator, FrameLogger};

/// Single entry point turning a frame into a narration result.
#[derive(Debug, Clone)]
pub struct NarrationPipeline {
    config: PipelineConfig,
    arbiter: NarrationArbiter,
}

impl Default for NarrationPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl NarrationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let arbiter = NarrationArbiter::new(config.arbiter());
        Self { config, arbiter }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one frame.
    ///
    /// The frame is downscaled to the configured maximum dimension first;
    /// detector boxes are expected in the downscaled pixel space.
    pub async fn process(
        &self,
        frame: Frame,
        detector: &dyn ObjectDetector,
        recognizer: &dyn TextRecognizer,
        enhancer: Option<Arc<dyn RemoteEnhancer>>,
    ) -> NarrationResult {
        let logger = FrameLogger::new();
        let span = logger.span();
        self.run(logger, frame, detector, recognizer, enhancer)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        logger: FrameLogger,
        frame: Frame,
        detector: &dyn ObjectDetector,
        recognizer: &dyn TextRecognizer,
        enhancer: Option<Arc<dyn RemoteEnhancer>>,
    ) -> NarrationResult {
        let frame = Arc::new(frame.downscaled(self.config.max_dimension));
        let (frame_width, frame_height) = (frame.width(), frame.height());
        logger.frame_ready(frame_width, frame_height);

        let detections = match detector.detect(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                logger.collaborator_failed(Collaborator::Detector, detector.name(), &e);
                Vec::new()
            }
        };

        let texts = match recognizer.recognize(&frame).await {
            Ok(texts) => texts,
            Err(e) => {
                logger.collaborator_failed(Collaborator::Recognizer, recognizer.name(), &e);
                Vec::new()
            }
        };

        let classified = classify(&detections, frame_width, frame_height, &self.config.spatial);
        let ranked = rank(&classified);
        let text_spans: Vec<String> = texts.iter().map(|t| t.text.clone()).collect();
        let near = ranked
            .iter()
            .filter(|d| d.distance() == Distance::Near)
            .count();
        logger.scene_ranked(ranked.len(), text_spans.len(), near);

        let outcome = self
            .arbiter
            .narrate_with_outcome(Arc::clone(&frame), &ranked, &text_spans, enhancer)
            .await;
        logger.narrated(outcome.source, outcome.fallback.as_ref(), outcome.waited);

        let summary = summarize(&ranked, &text_spans);
        let annotations: Vec<Annotation> = ranked
            .into_iter()
            .map(Annotation::Object)
            .chain(texts.into_iter().map(Annotation::Text))
            .collect();

        NarrationResult {
            narration: outcome.narration,
            source: outcome.source,
            summary,
            annotations,
            frame_width,
            frame_height,
        }
    }
}
