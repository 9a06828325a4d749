//! Geometry classifier.
//!
//! Maps each detection's box onto a horizontal side (from its center offset)
//! and a coarse distance (from its height relative to the frame).

use tracing::debug;
use wayside_models::{Detection, Distance, Placement, Side};

use crate::config::SpatialConfig;

/// Classify every detection against a frame of the given size.
///
/// Returns new detections; the input is left untouched. Detections with a
/// degenerate box, or any detection when the frame has no usable size, pass
/// through unchanged and keep reading as center / mid.
pub fn classify(
    detections: &[Detection],
    frame_width: u32,
    frame_height: u32,
    config: &SpatialConfig,
) -> Vec<Detection> {
    detections
        .iter()
        .map(|det| match placement_for(det, frame_width, frame_height, config) {
            Some(placement) => det.with_placement(placement),
            None => {
                debug!(label = %det.label, bbox = ?det.bbox, "Skipping classification");
                det.clone()
            }
        })
        .collect()
}

/// Compute the placement of one detection, if its geometry allows it.
pub fn placement_for(
    detection: &Detection,
    frame_width: u32,
    frame_height: u32,
    config: &SpatialConfig,
) -> Option<Placement> {
    let half_width = i64::from(frame_width / 2);
    if half_width == 0 || frame_height == 0 || !detection.bbox.is_valid() {
        return None;
    }

    Some(Placement::new(
        side_for(detection, half_width, config),
        distance_for(detection, frame_height, config),
    ))
}

fn side_for(detection: &Detection, half_width: i64, config: &SpatialConfig) -> Side {
    let offset = detection.bbox.center_x() - half_width;
    let rel_x = offset as f64 / half_width as f64;

    if rel_x.abs() <= config.center_band {
        Side::Center
    } else if rel_x < 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}

fn distance_for(detection: &Detection, frame_height: u32, config: &SpatialConfig) -> Distance {
    let height_ratio = detection.bbox.height() as f64 / f64::from(frame_height);

    if height_ratio >= config.near_ratio {
        Distance::Near
    } else if height_ratio <= config.far_ratio {
        Distance::Far
    } else {
        Distance::Mid
    }
}
