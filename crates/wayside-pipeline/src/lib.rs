//! Frame-to-narration pipeline.
//!
//! Ties the spatial analysis and enhancement crates together behind
//! [`NarrationPipeline::process`], and provides the configuration, logging
//! and scene-file collaborators used by the `wayside` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod scene;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::{Collaborator, FrameLogger};
pub use pipeline::NarrationPipeline;
pub use scene::{SceneFile, SceneObject, SceneText};
