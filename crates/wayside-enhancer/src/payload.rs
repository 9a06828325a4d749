//! Post-processing of raw enhancer output.

use serde_json::Value;
use wayside_spatial::{enforce_word_budget, MAX_NARRATION_WORDS};

use crate::error::{EnhancerError, EnhancerResult};

/// Key the enhancer is asked to put its narration under.
pub const NARRATION_KEY: &str = "narration";

/// Turn raw enhancer text into a word-bounded narration.
///
/// Strips surrounding whitespace and markdown code fences, unwraps a
/// one-key JSON object such as `{"narration": "..."}`, and truncates the
/// result to `max_words` words, clamped to 1..=12 like the local composer.
pub fn extract_narration(raw: &str, max_words: usize) -> EnhancerResult<String> {
    let text = strip_code_fence(raw.trim());

    let narration = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => unwrap_json(&text[start..=end])?,
        _ => text.to_string(),
    };

    let narration = narration.trim();
    if narration.is_empty() {
        return Err(EnhancerError::EmptyPayload);
    }

    Ok(enforce_word_budget(
        narration,
        max_words.clamp(1, MAX_NARRATION_WORDS),
    ))
}

fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn unwrap_json(candidate: &str) -> EnhancerResult<String> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| EnhancerError::malformed(format!("invalid JSON payload: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| EnhancerError::malformed("payload is not an object"))?;

    if let Some(narration) = object.get(NARRATION_KEY) {
        return narration
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| EnhancerError::malformed("narration is not a string"));
    }

    match object.values().next() {
        Some(Value::String(only)) if object.len() == 1 => Ok(only.clone()),
        _ => Err(EnhancerError::malformed(format!(
            "missing \"{}\" key",
            NARRATION_KEY
        ))),
    }
}
