//! Command line arguments backing the `wayside` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wayside",
    about = "Turn a street-level photo into a short spoken navigation hint",
    version
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Narrate one image using recorded detector and OCR output
    Narrate {
        /// Image to narrate (JPEG or PNG)
        image: PathBuf,

        /// Scene file with normalized object and text boxes
        #[arg(long, short = 's')]
        scene: PathBuf,

        /// Skip the remote enhancer and always use the local composer
        #[arg(long)]
        no_enhance: bool,

        /// Keep all recognized text instead of only navigation text
        #[arg(long)]
        all_text: bool,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
    /// Validate configuration and report enhancer availability
    Check,
}
