//! Deterministic narration composer.
//!
//! Rules, first match wins:
//! 1. nothing detected: a fixed sentence
//! 2. first near hazard: `Caution: <label> ahead <side>.`
//! 3. first text span: `Sign reads: <text>`
//! 4. first detection: `<label> detected <side>, <distance>.`
//!
//! A near second detection is appended when the sentence is short, and the
//! word budget is enforced last on every branch.

use wayside_models::{Detection, Distance};

use crate::ranker::is_hazard;

/// Maximum number of words in a spoken narration.
pub const MAX_NARRATION_WORDS: usize = 12;

/// Sentences shorter than this (in characters) may mention a second object.
pub const EXTENSION_CHAR_LIMIT: usize = 50;

pub const EMPTY_SCENE_NARRATION: &str = "No objects or text detected in this scene.";

/// Compose a narration from ranked detections and text spans.
///
/// Detections are read in the order given; the composer does not re-rank.
/// Always returns a non-empty string of at most `MAX_NARRATION_WORDS` words.
pub fn compose(ranked: &[Detection], text_spans: &[String]) -> String {
    compose_within(ranked, text_spans, MAX_NARRATION_WORDS)
}

/// Same as [`compose`] with an explicit word budget (clamped to 1..=12).
pub fn compose_within(ranked: &[Detection], text_spans: &[String], max_words: usize) -> String {
    let max_words = max_words.clamp(1, MAX_NARRATION_WORDS);

    if ranked.is_empty() && text_spans.is_empty() {
        return enforce_word_budget(EMPTY_SCENE_NARRATION, max_words);
    }

    let mut narration = String::new();

    if let Some(hazard) = ranked
        .iter()
        .find(|d| d.distance() == Distance::Near && is_hazard(&d.label))
    {
        narration.push_str(&format!(
            "Caution: {} ahead {}.",
            hazard.label,
            hazard.side()
        ));
    }

    if narration.is_empty() {
        if let Some(text) = text_spans.first() {
            narration.push_str(&format!("Sign reads: {}", text));
        }
    }

    if narration.is_empty() {
        if let Some(first) = ranked.first() {
            narration.push_str(&format!(
                "{} detected {}, {}.",
                first.label,
                first.side(),
                first.distance()
            ));
        }
    }

    if narration.chars().count() < EXTENSION_CHAR_LIMIT {
        if let Some(second) = ranked.get(1).filter(|d| d.distance() == Distance::Near) {
            narration.push_str(&format!(" Also {} {}.", second.label, second.side()));
        }
    }

    enforce_word_budget(&narration, max_words)
}

/// Truncate `text` to `max_words` whitespace-separated words.
///
/// Text within budget is returned unchanged. Longer text keeps its first
/// `max_words` words joined by single spaces and gains a trailing period.
pub fn enforce_word_budget(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }

    let mut shortened = words[..max_words].join(" ");
    shortened.push('.');
    shortened
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
