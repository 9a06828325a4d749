//! Recorded scene files.
//!
//! A scene file holds detector and OCR output captured for one image, with
//! boxes in normalized `[0, 1]` coordinates so the same file works for any
//! frame size:
//!
//! ```json
//! {
//!   "objects": [
//!     { "label": "car", "score": 0.92, "xmin": 0.05, "ymin": 0.4, "xmax": 0.3, "ymax": 0.9 },
//!     { "class_id": 0, "score": 0.81, "xmin": 0.45, "ymin": 0.5, "xmax": 0.55, "ymax": 0.7 }
//!   ],
//!   "text": [
//!     { "text": "STOP", "xmin": 0.7, "ymin": 0.1, "xmax": 0.8, "ymax": 0.2 }
//!   ]
//! }
//! ```
//!
//! `SceneFile` replays that output through the detector and recognizer
//! traits, so the pipeline can run without on-device models.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use wayside_models::{Detection, TextObservation};
use wayside_spatial::{
    coco_label, detections_from_normalized, pixel_box, Frame, ObjectDetector, PostprocessConfig,
    RawDetection, SpatialResult, TextRecognizer,
};

use crate::error::{PipelineError, PipelineResult};

/// One recorded object. Either `label` or a COCO `class_id` names it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub class_id: Option<usize>,
    pub score: f32,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl SceneObject {
    fn resolved_label(&self) -> Option<String> {
        self.label
            .clone()
            .or_else(|| self.class_id.and_then(coco_label).map(str::to_string))
    }
}

/// One recorded text block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneText {
    pub text: String,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// Recorded detector and OCR output for one image.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub text: Vec<SceneText>,
    #[serde(skip)]
    postprocess: PostprocessConfig,
}

impl SceneFile {
    /// Read and validate a scene file.
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::SceneNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let scene: SceneFile = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Use these filtering settings when replaying objects.
    pub fn with_postprocess(mut self, postprocess: PostprocessConfig) -> Self {
        self.postprocess = postprocess;
        self
    }

    fn validate(&self) -> PipelineResult<()> {
        for (index, object) in self.objects.iter().enumerate() {
            if object.resolved_label().is_none() {
                return Err(PipelineError::invalid_scene(format!(
                    "object {} has no label and no known class_id",
                    index
                )));
            }
            if !(0.0..=1.0).contains(&object.score) {
                return Err(PipelineError::invalid_scene(format!(
                    "object {} score {} is outside [0, 1]",
                    index, object.score
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectDetector for SceneFile {
    async fn detect(&self, frame: &Frame) -> SpatialResult<Vec<Detection>> {
        let raw: Vec<RawDetection> = self
            .objects
            .iter()
            .filter_map(|object| {
                Some(RawDetection {
                    label: object.resolved_label()?,
                    score: object.score,
                    xmin: object.xmin,
                    ymin: object.ymin,
                    xmax: object.xmax,
                    ymax: object.ymax,
                })
            })
            .collect();

        Ok(detections_from_normalized(
            &raw,
            frame.width(),
            frame.height(),
            &self.postprocess,
        ))
    }

    fn name(&self) -> &'static str {
        "scene_file"
    }
}

#[async_trait]
impl TextRecognizer for SceneFile {
    async fn recognize(&self, frame: &Frame) -> SpatialResult<Vec<TextObservation>> {
        let observations: Vec<TextObservation> = self
            .text
            .iter()
            .filter_map(|block| {
                let bbox = pixel_box(
                    block.xmin,
                    block.ymin,
                    block.xmax,
                    block.ymax,
                    frame.width(),
                    frame.height(),
                );
                if !bbox.is_valid() {
                    debug!(text = %block.text, "Dropping text block with empty box");
                    return None;
                }
                Some(TextObservation::new(block.text.clone(), bbox))
            })
            .collect();

        Ok(observations)
    }

    fn name(&self) -> &'static str {
        "scene_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::io::Write;
    use wayside_models::BoundingBox;

    fn frame(width: u32, height: u32) -> Frame {
        Frame::new(DynamicImage::new_rgb8(width, height))
    }

    const SCENE: &str = r#"{
        "objects": [
            { "label": "car", "score": 0.92, "xmin": 0.25, "ymin": 0.5, "xmax": 0.75, "ymax": 1.0 },
            { "class_id": 16, "score": 0.8, "xmin": 0.0, "ymin": 0.0, "xmax": 0.5, "ymax": 0.5 },
            { "label": "bench", "score": 0.3, "xmin": 0.1, "ymin": 0.1, "xmax": 0.2, "ymax": 0.2 }
        ],
        "text": [
            { "text": "STOP", "xmin": 0.5, "ymin": 0.0, "xmax": 0.75, "ymax": 0.25 },
            { "text": "ghost", "xmin": 0.5, "ymin": 0.5, "xmax": 0.5, "ymax": 0.6 }
        ]
    }"#;

    #[tokio::test]
    async fn test_detect_scales_and_filters() {
        let scene = SceneFile::from_json(SCENE).unwrap();
        let detections = scene.detect(&frame(640, 480)).await.unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].label, "car");
        assert_eq!(detections[0].bbox, BoundingBox::new(160, 240, 480, 479));
        assert_eq!(detections[1].label, "dog");
        assert!(detections.iter().all(|d| !d.is_classified()));
    }

    #[tokio::test]
    async fn test_min_confidence_override() {
        let scene = SceneFile::from_json(SCENE).unwrap().with_postprocess(PostprocessConfig {
            min_confidence: 0.2,
            ..PostprocessConfig::default()
        });
        let detections = scene.detect(&frame(640, 480)).await.unwrap();
        assert_eq!(detections.len(), 3);
    }

    #[tokio::test]
    async fn test_recognize_drops_empty_boxes() {
        let scene = SceneFile::from_json(SCENE).unwrap();
        let texts = scene.recognize(&frame(640, 480)).await.unwrap();

        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "STOP");
        assert_eq!(texts[0].bbox, BoundingBox::new(320, 0, 480, 120));
    }

    #[test]
    fn test_missing_label_rejected() {
        let json = r#"{ "objects": [ { "score": 0.9, "xmin": 0, "ymin": 0, "xmax": 1, "ymax": 1 } ] }"#;
        let err = SceneFile::from_json(json).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidScene(_)));
    }

    #[test]
    fn test_unknown_class_id_rejected() {
        let json = r#"{ "objects": [ { "class_id": 500, "score": 0.9, "xmin": 0, "ymin": 0, "xmax": 1, "ymax": 1 } ] }"#;
        assert!(SceneFile::from_json(json).is_err());
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneFile::from_json("{}").unwrap();
        assert!(scene.objects.is_empty());
        assert!(scene.text.is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCENE.as_bytes()).unwrap();

        let scene = SceneFile::load(file.path()).unwrap();
        assert_eq!(scene.objects.len(), 3);
        assert_eq!(scene.text.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneFile::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PipelineError::SceneNotFound(_)));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = SceneFile::load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::SceneParse(_)));
    }
}
