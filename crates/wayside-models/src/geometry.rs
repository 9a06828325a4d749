use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in integer pixel coordinates of the processed frame.
///
/// Width, height and center are always derived from the four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// Left edge (inclusive)
    pub left: i32,
    /// Top edge (inclusive)
    pub top: i32,
    /// Right edge, greater than `left` for a well-formed box
    pub right: i32,
    /// Bottom edge, greater than `top` for a well-formed box
    pub bottom: i32,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    // Derived values are i64: edge arithmetic never overflows.

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Horizontal center, rounded toward zero.
    pub fn center_x(&self) -> i64 {
        (i64::from(self.left) + i64::from(self.right)) / 2
    }

    /// Vertical center, rounded toward zero.
    pub fn center_y(&self) -> i64 {
        (i64::from(self.top) + i64::from(self.bottom)) / 2
    }

    /// Check that the box has a positive area.
    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.bottom > self.top
    }
}
