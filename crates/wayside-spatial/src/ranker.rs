//! Priority ranking and the hazard predicate.

use std::cmp::Ordering;

use wayside_models::Detection;

/// Label fragments that mark a safety-relevant obstacle.
pub const HAZARD_KEYWORDS: &[&str] = &[
    "car",
    "truck",
    "bus",
    "bicycle",
    "motorcycle",
    "cone",
    "barrier",
    "pole",
    "curb",
    "stair",
];

/// Order detections nearest first, then by descending confidence.
///
/// The sort is stable: detections with equal distance and confidence keep
/// their input order. Hazard status plays no part in ranking.
pub fn rank(detections: &[Detection]) -> Vec<Detection> {
    let mut ranked = detections.to_vec();
    ranked.sort_by(compare_priority);
    ranked
}

fn compare_priority(a: &Detection, b: &Detection) -> Ordering {
    a.distance()
        .priority()
        .cmp(&b.distance().priority())
        .then_with(|| b.confidence.total_cmp(&a.confidence))
}

/// Substring match of the lowercased label against `HAZARD_KEYWORDS`.
pub fn is_hazard(label: &str) -> bool {
    let label = label.to_lowercase();
    HAZARD_KEYWORDS.iter().any(|keyword| label.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayside_models::{BoundingBox, Distance, Placement, Side};

    fn placed(label: &str, confidence: f32, distance: Distance) -> Detection {
        Detection::new(label, confidence, BoundingBox::new(0, 0, 10, 10))
            .with_placement(Placement::new(Side::Center, distance))
    }

    fn labels(dets: &[Detection]) -> Vec<&str> {
        dets.iter().map(|d| d.label.as_str()).collect()
    }

    #[test]
    fn test_distance_then_confidence() {
        let input = vec![
            placed("far-high", 0.99, Distance::Far),
            placed("mid-low", 0.40, Distance::Mid),
            placed("near-low", 0.30, Distance::Near),
            placed("mid-high", 0.90, Distance::Mid),
            placed("near-high", 0.80, Distance::Near),
        ];

        assert_eq!(
            labels(&rank(&input)),
            vec!["near-high", "near-low", "mid-high", "mid-low", "far-high"]
        );
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let input = vec![
            placed("first", 0.75, Distance::Mid),
            placed("second", 0.75, Distance::Mid),
            placed("third", 0.75, Distance::Mid),
        ];
        assert_eq!(labels(&rank(&input)), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unclassified_ranks_as_mid() {
        let unclassified = Detection::new("box", 0.5, BoundingBox::new(0, 0, 0, 0));
        let input = vec![
            placed("far", 0.9, Distance::Far),
            unclassified,
            placed("near", 0.1, Distance::Near),
        ];
        assert_eq!(labels(&rank(&input)), vec!["near", "box", "far"]);
    }

    #[test]
    fn test_hazard_predicate() {
        assert!(is_hazard("car"));
        assert!(is_hazard("Traffic Cone"));
        assert!(is_hazard("STAIRCASE"));
        assert!(is_hazard("bus stop"));
        assert!(!is_hazard("person"));
        assert!(!is_hazard("dog"));
        assert!(!is_hazard("bench"));
    }
}
