//! Remote narration enhancement with a guaranteed local fallback.
//!
//! This crate provides:
//! - The `RemoteEnhancer` collaborator trait and request summaries
//! - Post-processing of enhancer payloads
//! - `NarrationArbiter`, which bounds the remote call by a deadline and
//!   falls back to the deterministic composer
//! - A Gemini-backed enhancer

pub mod arbiter;
pub mod enhancer;
pub mod error;
pub mod gemini;
pub mod payload;

pub use arbiter::{ArbiterConfig, ArbiterOutcome, FallbackReason, NarrationArbiter};
pub use enhancer::{EnhancementRequest, RemoteEnhancer, MAX_REQUEST_DETECTIONS, MAX_REQUEST_TEXT_SPANS};
pub use error::{EnhancerError, EnhancerResult};
pub use gemini::{GeminiConfig, GeminiEnhancer};
pub use payload::extract_narration;
