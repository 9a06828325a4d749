//! Human-readable scene summary for display alongside the narration.

use wayside_models::Detection;

/// Objects listed before collapsing the rest into "and N more".
pub const SUMMARY_MAX_OBJECTS: usize = 5;
/// Text spans listed in the summary.
pub const SUMMARY_MAX_TEXTS: usize = 3;

pub const EMPTY_SUMMARY: &str = "No objects or text detected.";

/// Render ranked detections and text spans into a display string.
///
/// ```text
/// Objects: car (left, near) • person (center, mid) and 2 more
/// Text: STOP, EXIT
/// ```
pub fn summarize(ranked: &[Detection], text_spans: &[String]) -> String {
    if ranked.is_empty() && text_spans.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let mut lines = Vec::with_capacity(2);

    if !ranked.is_empty() {
        let listed = ranked
            .iter()
            .take(SUMMARY_MAX_OBJECTS)
            .map(|d| format!("{} ({}, {})", d.label, d.side(), d.distance()))
            .collect::<Vec<_>>()
            .join(" • ");

        let mut line = format!("Objects: {}", listed);
        if ranked.len() > SUMMARY_MAX_OBJECTS {
            line.push_str(&format!(" and {} more", ranked.len() - SUMMARY_MAX_OBJECTS));
        }
        lines.push(line);
    }

    if !text_spans.is_empty() {
        let listed = text_spans
            .iter()
            .take(SUMMARY_MAX_TEXTS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Text: {}", listed));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayside_models::{BoundingBox, Distance, Placement, Side};

    fn placed(label: &str) -> Detection {
        Detection::new(label, 0.9, BoundingBox::new(0, 0, 1, 1))
            .with_placement(Placement::new(Side::Left, Distance::Near))
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[], &[]), "No objects or text detected.");
    }

    #[test]
    fn test_objects_and_text() {
        let summary = summarize(
            &[placed("car"), placed("cone")],
            &["STOP".to_string(), "EXIT".to_string()],
        );
        assert_eq!(
            summary,
            "Objects: car (left, near) • cone (left, near)\nText: STOP, EXIT"
        );
    }

    #[test]
    fn test_caps_objects_and_text() {
        let dets: Vec<Detection> = (0..7).map(|i| placed(&format!("obj{}", i))).collect();
        let texts: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let summary = summarize(&dets, &texts);

        assert!(summary.contains("obj4 (left, near) and 2 more"));
        assert!(!summary.contains("obj5"));
        assert!(summary.ends_with("Text: a, b, c"));
    }

    #[test]
    fn test_text_only() {
        assert_eq!(summarize(&[], &["WALK".to_string()]), "Text: WALK");
    }
}
