//! Spatial analysis and narration composition for single camera frames.
//!
//! This crate provides:
//! - Frame loading and downscaling
//! - Collaborator traits for object detection and text recognition
//! - Geometry classification of detections into side / distance
//! - Priority ranking and the hazard predicate
//! - The deterministic, word-bounded narration composer
//! - Display summaries

pub mod classifier;
pub mod composer;
pub mod config;
pub mod error;
pub mod frame;
pub mod postprocess;
pub mod providers;
pub mod ranker;
pub mod summary;

pub use classifier::{classify, placement_for};
pub use composer::{
    compose, compose_within, enforce_word_budget, word_count, EMPTY_SCENE_NARRATION,
    MAX_NARRATION_WORDS,
};
pub use config::SpatialConfig;
pub use error::{SpatialError, SpatialResult};
pub use frame::{Frame, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION};
pub use postprocess::{
    coco_label, detections_from_normalized, pixel_box, PostprocessConfig, RawDetection, COCO_LABELS,
};
pub use providers::{is_navigation_text, NavigationTextFilter, ObjectDetector, TextRecognizer};
pub use ranker::{is_hazard, rank, HAZARD_KEYWORDS};
pub use summary::summarize;
