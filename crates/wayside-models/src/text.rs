use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// A recognized, navigation-relevant text span.
///
/// Text is not spatially classified and carries no recognition confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextObservation {
    pub text: String,
    pub bbox: BoundingBox,
}

impl TextObservation {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}
