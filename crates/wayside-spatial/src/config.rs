//! Thresholds for spatial classification.

/// Geometry classifier thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialConfig {
    /// Half-width of the center band, as a fraction of half the frame width
    pub center_band: f64,
    /// Box height / frame height at or above which an object is near
    pub near_ratio: f64,
    /// Box height / frame height at or below which an object is far
    pub far_ratio: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            center_band: 0.15,
            near_ratio: 0.30,
            far_ratio: 0.10,
        }
    }
}

impl SpatialConfig {
    /// Check that the thresholds describe a usable band layout.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.center_band)
            && self.far_ratio > 0.0
            && self.far_ratio < self.near_ratio
            && self.near_ratio <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SpatialConfig::default().is_valid());
    }

    #[test]
    fn test_inverted_ratios_rejected() {
        let config = SpatialConfig {
            near_ratio: 0.1,
            far_ratio: 0.3,
            ..Default::default()
        };
        assert!(!config.is_valid());
    }
}
