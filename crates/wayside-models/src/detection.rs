//! Object detections and their spatial placement.
//!
//! A `Detection` is created by the detector collaborator without a placement.
//! Spatial classification produces a new `Detection` carrying a `Placement`;
//! until then `side()` reads as `Side::Center` and `distance()` as
//! `Distance::Mid`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::geometry::BoundingBox;

/// Horizontal position of an object relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    #[default]
    Center,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Center => "center",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "center" | "centre" => Ok(Side::Center),
            "right" => Ok(Side::Right),
            _ => Err(PlacementParseError::Side(s.to_string())),
        }
    }
}

/// Coarse distance of an object, estimated from its apparent height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Near,
    #[default]
    Mid,
    Far,
}

impl Distance {
    pub const ALL: &'static [Distance] = &[Distance::Near, Distance::Mid, Distance::Far];

    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Near => "near",
            Distance::Mid => "mid",
            Distance::Far => "far",
        }
    }

    /// Ranking priority (0 = most urgent).
    pub fn priority(&self) -> u8 {
        match self {
            Distance::Near => 0,
            Distance::Mid => 1,
            Distance::Far => 2,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Distance {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "near" => Ok(Distance::Near),
            "mid" => Ok(Distance::Mid),
            "far" => Ok(Distance::Far),
            _ => Err(PlacementParseError::Distance(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementParseError {
    #[error("Unknown side: {0}")]
    Side(String),
    #[error("Unknown distance: {0}")]
    Distance(String),
}

/// Spatial category assigned by the geometry classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Placement {
    pub side: Side,
    pub distance: Distance,
}

impl Placement {
    pub fn new(side: Side, distance: Distance) -> Self {
        Self { side, distance }
    }
}

/// A labeled, scored object observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Free-form class label (e.g. "car", "traffic light")
    pub label: String,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Pixel-space bounding box
    pub bbox: BoundingBox,
    /// Set by spatial classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl Detection {
    /// Create an unclassified detection.
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            placement: None,
        }
    }

    /// Return a copy of this detection carrying the given placement.
    pub fn with_placement(&self, placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..self.clone()
        }
    }

    /// Side of the frame, `Side::Center` when unclassified.
    pub fn side(&self) -> Side {
        self.placement.map(|p| p.side).unwrap_or_default()
    }

    /// Estimated distance, `Distance::Mid` when unclassified.
    pub fn distance(&self) -> Distance {
        self.placement.map(|p| p.distance).unwrap_or_default()
    }

    pub fn is_classified(&self) -> bool {
        self.placement.is_some()
    }
}
