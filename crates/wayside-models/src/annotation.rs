//! Overlay annotations handed to the rendering layer.
//!
//! Annotations serialize to a flat entry per box:
//!
//! ```json
//! {"type": "object", "label": "car", "confidence": 0.91, "side": "left",
//!  "distance": "near", "bbox": {"left": 0, "top": 10, "right": 120, "bottom": 200}}
//! ```
//!
//! Text entries use placeholder values: confidence `1.0`, side `center`,
//! distance `mid`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection::{Detection, Distance, Side};
use crate::geometry::BoundingBox;
use crate::text::TextObservation;

/// Confidence reported for text entries, which carry none of their own.
pub const TEXT_PLACEHOLDER_CONFIDENCE: f32 = 1.0;

/// One box to draw on the frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "OverlayEntry")]
pub enum Annotation {
    Object(Detection),
    Text(TextObservation),
}

impl Annotation {
    pub fn kind(&self) -> EntryKind {
        match self {
            Annotation::Object(_) => EntryKind::Object,
            Annotation::Text(_) => EntryKind::Text,
        }
    }

    pub fn bbox(&self) -> BoundingBox {
        match self {
            Annotation::Object(det) => det.bbox,
            Annotation::Text(text) => text.bbox,
        }
    }

    /// Label rendered next to the box.
    pub fn label(&self) -> &str {
        match self {
            Annotation::Object(det) => &det.label,
            Annotation::Text(text) => &text.text,
        }
    }
}

impl From<Detection> for Annotation {
    fn from(det: Detection) -> Self {
        Annotation::Object(det)
    }
}

impl From<TextObservation> for Annotation {
    fn from(text: TextObservation) -> Self {
        Annotation::Text(text)
    }
}

/// Variant discriminator for overlay entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Object,
    Text,
}

/// Wire form of an `Annotation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub label: String,
    pub confidence: f32,
    pub side: Side,
    pub distance: Distance,
    pub bbox: BoundingBox,
}

impl From<Annotation> for OverlayEntry {
    fn from(annotation: Annotation) -> Self {
        match annotation {
            Annotation::Object(det) => OverlayEntry {
                kind: EntryKind::Object,
                side: det.side(),
                distance: det.distance(),
                label: det.label,
                confidence: det.confidence,
                bbox: det.bbox,
            },
            Annotation::Text(text) => OverlayEntry {
                kind: EntryKind::Text,
                label: text.text,
                confidence: TEXT_PLACEHOLDER_CONFIDENCE,
                side: Side::Center,
                distance: Distance::Mid,
                bbox: text.bbox,
            },
        }
    }
}
