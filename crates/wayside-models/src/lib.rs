//! Shared data models for the Wayside narration pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Bounding boxes in pixel coordinates
//! - Object detections and their spatial placement
//! - Recognized text spans
//! - Overlay annotations and the per-frame narration result

pub mod annotation;
pub mod detection;
pub mod geometry;
pub mod narration;
pub mod text;

// Re-export common types
pub use annotation::{Annotation, EntryKind, OverlayEntry, TEXT_PLACEHOLDER_CONFIDENCE};
pub use detection::{Detection, Distance, Placement, PlacementParseError, Side};
pub use geometry::BoundingBox;
pub use narration::{NarrationResult, NarrationSource};
pub use text::TextObservation;
