use serde::Serialize;
use std::fmt;

use crate::annotation::Annotation;

/// Which path produced the spoken narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationSource {
    /// Remote enhancer returned a usable narration in time.
    Enhanced,
    /// Deterministic local composer.
    Local,
}

impl NarrationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrationSource::Enhanced => "enhanced",
            NarrationSource::Local => "local",
        }
    }
}

impl fmt::Display for NarrationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output bundle for one processed frame.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationResult {
    /// Spoken hint, at most twelve words
    pub narration: String,
    pub source: NarrationSource,
    /// Multi-line display summary
    pub summary: String,
    /// Ranked objects followed by text spans
    pub annotations: Vec<Annotation>,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl NarrationResult {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn object_count(&self) -> usize {
        self.annotations
            .iter()
            .filter(|a| matches!(a, Annotation::Object(_)))
            .count()
    }

    pub fn text_count(&self) -> usize {
        self.annotations.len() - self.object_count()
    }
}
