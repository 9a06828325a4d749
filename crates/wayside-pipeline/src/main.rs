//! `wayside` command-line binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wayside_enhancer::{GeminiConfig, GeminiEnhancer, RemoteEnhancer};
use wayside_pipeline::cli::{Args, Commands};
use wayside_pipeline::{NarrationPipeline, PipelineConfig, SceneFile};
use wayside_spatial::{Frame, NavigationTextFilter, TextRecognizer};

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayside=info"));

    // stdout carries the result JSON
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Already installed is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = PipelineConfig::from_env();
    config.validate().context("invalid pipeline configuration")?;

    match args.command {
        Commands::Narrate {
            image,
            scene,
            no_enhance,
            all_text,
            pretty,
        } => {
            let frame = Frame::open(&image)
                .with_context(|| format!("failed to load image {}", image.display()))?;
            let scene = SceneFile::load(&scene)
                .with_context(|| format!("failed to load scene {}", scene.display()))?
                .with_postprocess(config.postprocess());

            let enhancer: Option<Arc<dyn RemoteEnhancer>> = if no_enhance {
                None
            } else {
                Some(Arc::new(
                    GeminiEnhancer::from_env().context("failed to create enhancer")?,
                ))
            };

            let filtered;
            let recognizer: &dyn TextRecognizer = if all_text {
                &scene
            } else {
                filtered = NavigationTextFilter::new(scene.clone());
                &filtered
            };

            let pipeline = NarrationPipeline::new(config);
            let result = pipeline.process(frame, &scene, recognizer, enhancer).await;
            println!("{}", result.to_json(pretty)?);
        }
        Commands::Check => {
            info!("Pipeline config: {:?}", config);
            let gemini = GeminiConfig::from_env();
            if gemini.is_configured() {
                info!(models = ?gemini.models, "Remote enhancer configured");
            } else {
                warn!("GEMINI_API_KEY not set; narration will always be composed locally");
            }
            println!("configuration ok");
        }
    }

    Ok(())
}
