//! Per-frame structured logging.
//!
//! Every processed frame gets its own id so that the detector, arbiter and
//! enhancer events for one invocation can be correlated in JSON logs. Events
//! carry their measurements as fields rather than inside the message.

use std::fmt::Display;
use std::time::Duration;

use tracing::{info, warn, Span};
use uuid::Uuid;
use wayside_enhancer::FallbackReason;
use wayside_models::NarrationSource;

/// Pipeline stage that talks to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Detector,
    Recognizer,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::Detector => "detector",
            Collaborator::Recognizer => "recognizer",
        }
    }
}

/// Structured logger bound to a single frame.
#[derive(Debug, Clone)]
pub struct FrameLogger {
    frame_id: String,
}

impl Default for FrameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLogger {
    /// Logger with a fresh v4 frame id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
        }
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Frame decoded and resized to the working resolution.
    pub fn frame_ready(&self, width: u32, height: u32) {
        info!(frame_id = %self.frame_id, width, height, "Frame ready");
    }

    /// A collaborator failed; the stage continues with no input.
    pub fn collaborator_failed(&self, stage: Collaborator, provider: &str, error: &dyn Display) {
        warn!(
            frame_id = %self.frame_id,
            collaborator = stage.as_str(),
            provider,
            error = %error,
            "Collaborator failed, continuing without its output"
        );
    }

    pub fn scene_ranked(&self, objects: usize, text_spans: usize, near: usize) {
        info!(
            frame_id = %self.frame_id,
            objects,
            text_spans,
            near,
            "Scene ranked"
        );
    }

    pub fn narrated(
        &self,
        source: NarrationSource,
        fallback: Option<&FallbackReason>,
        waited: Duration,
    ) {
        let fallback = fallback.map(|reason| reason.to_string());
        info!(
            frame_id = %self.frame_id,
            source = source.as_str(),
            fallback = fallback.as_deref().unwrap_or("none"),
            waited_ms = waited.as_millis() as u64,
            "Narration chosen"
        );
    }

    /// Span wrapping all work done for this frame.
    pub fn span(&self) -> Span {
        tracing::info_span!("frame", frame_id = %self.frame_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        out.text()
    }

    #[test]
    fn test_fresh_ids_differ() {
        let a = FrameLogger::new();
        let b = FrameLogger::new();

        assert_ne!(a.frame_id(), b.frame_id());
        assert!(Uuid::parse_str(a.frame_id()).is_ok());
    }

    #[test]
    fn test_collaborator_failure_fields() {
        let logger = FrameLogger::with_id("frame-7");
        let logs = capture(|| {
            logger.collaborator_failed(Collaborator::Recognizer, "scene_file", &"ocr crashed")
        });

        assert!(logs.contains("WARN"));
        assert!(logs.contains("frame_id=frame-7"));
        assert!(logs.contains("collaborator=\"recognizer\""));
        assert!(logs.contains("ocr crashed"));
    }

    #[test]
    fn test_narration_fields() {
        let logger = FrameLogger::with_id("frame-8");
        let logs = capture(|| {
            logger.narrated(
                NarrationSource::Local,
                Some(&FallbackReason::Timeout),
                Duration::from_millis(1500),
            )
        });

        assert!(logs.contains("source=\"local\""));
        assert!(logs.contains("fallback=\"timeout\""));
        assert!(logs.contains("waited_ms=1500"));
    }
}
