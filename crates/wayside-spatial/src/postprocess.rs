//! Conversion of normalized detector output into pixel-space detections.
//!
//! SSD-style detectors report boxes as fractions of the input frame. This
//! module scales them to the frame, clamps them to its bounds and drops
//! low-confidence or degenerate results so that only well-formed
//! detections reach the classifier.

use tracing::debug;
use wayside_models::{BoundingBox, Detection};

/// COCO class names (80 classes), indexed by class id.
pub const COCO_LABELS: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck",
    "boat", "traffic light", "fire hydrant", "stop sign", "parking meter", "bench",
    "bird", "cat", "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra",
    "giraffe", "backpack", "umbrella", "handbag", "tie", "suitcase", "frisbee",
    "skis", "snowboard", "sports ball", "kite", "baseball bat", "baseball glove",
    "skateboard", "surfboard", "tennis racket", "bottle", "wine glass", "cup",
    "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink",
    "refrigerator", "book", "clock", "vase", "scissors", "teddy bear", "hair drier",
    "toothbrush",
];

/// Look up a COCO label by class id.
pub fn coco_label(class_id: usize) -> Option<&'static str> {
    COCO_LABELS.get(class_id).copied()
}

/// One detector output row with a box in normalized [0, 1] coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub label: String,
    pub score: f32,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// Filtering applied to raw detector output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostprocessConfig {
    /// Scores below this are dropped
    pub min_confidence: f32,
    /// Only the first this many rows are considered
    pub max_detections: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            max_detections: 10,
        }
    }
}

/// Scale, clamp and filter raw rows for a `width` x `height` frame.
pub fn detections_from_normalized(
    raw: &[RawDetection],
    width: u32,
    height: u32,
    config: &PostprocessConfig,
) -> Vec<Detection> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let detections: Vec<Detection> = raw
        .iter()
        .take(config.max_detections)
        .filter(|row| row.score >= config.min_confidence)
        .filter_map(|row| {
            let bbox = pixel_box(row.xmin, row.ymin, row.xmax, row.ymax, width, height);
            bbox.is_valid()
                .then(|| Detection::new(row.label.clone(), row.score.clamp(0.0, 1.0), bbox))
        })
        .collect();

    debug!(
        raw = raw.len(),
        kept = detections.len(),
        "Post-processed detector output"
    );
    detections
}

/// Scale a normalized box to pixels, clamped to the frame.
///
/// The result may be degenerate; callers check `BoundingBox::is_valid`.
pub fn pixel_box(xmin: f32, ymin: f32, xmax: f32, ymax: f32, width: u32, height: u32) -> BoundingBox {
    let max_x = width.saturating_sub(1) as i32;
    let max_y = height.saturating_sub(1) as i32;

    BoundingBox::new(
        ((xmin * width as f32) as i32).max(0),
        ((ymin * height as f32) as i32).max(0),
        ((xmax * width as f32) as i32).min(max_x),
        ((ymax * height as f32) as i32).min(max_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, score: f32, xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> RawDetection {
        RawDetection {
            label: label.to_string(),
            score,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    #[test]
    fn test_scales_to_pixels() {
        let out = detections_from_normalized(
            &[row("car", 0.9, 0.25, 0.5, 0.75, 1.0)],
            640,
            480,
            &PostprocessConfig::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bbox, BoundingBox::new(160, 240, 480, 479));
        assert!(!out[0].is_classified());
    }

    #[test]
    fn test_clamps_out_of_range() {
        let out = detections_from_normalized(
            &[row("bus", 0.8, -0.2, -0.1, 1.3, 1.2)],
            100,
            50,
            &PostprocessConfig::default(),
        );
        assert_eq!(out[0].bbox, BoundingBox::new(0, 0, 99, 49));
    }

    #[test]
    fn test_drops_low_score_and_degenerate() {
        let out = detections_from_normalized(
            &[
                row("low", 0.49, 0.0, 0.0, 0.5, 0.5),
                row("flat", 0.9, 0.1, 0.5, 0.9, 0.5),
                row("ok", 0.5, 0.0, 0.0, 0.5, 0.5),
            ],
            100,
            100,
            &PostprocessConfig::default(),
        );
        let labels: Vec<&str> = out.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["ok"]);
    }

    #[test]
    fn test_respects_max_detections() {
        let rows: Vec<RawDetection> = (0..15).map(|_| row("cone", 0.9, 0.0, 0.0, 0.5, 0.5)).collect();
        let out = detections_from_normalized(&rows, 100, 100, &PostprocessConfig::default());
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_coco_lookup() {
        assert_eq!(coco_label(0), Some("person"));
        assert_eq!(coco_label(2), Some("car"));
        assert_eq!(coco_label(79), Some("toothbrush"));
        assert_eq!(coco_label(80), None);
    }
}
