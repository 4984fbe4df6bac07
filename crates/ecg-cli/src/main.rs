#![forbid(unsafe_code)]

//! ECG CLI
//!
//! Terminal front-end for the ECG analyzer: validates local image files,
//! renders the upload screen, and submits the batch to a relay.

mod commands;
mod files;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecg_client::{DEFAULT_RELAY_URL, RelayClient};
use ecg_core::ImageValidator;
use ecg_core::validator::DEFAULT_MAX_IMAGES;

/// ECG analyzer command-line interface
#[derive(Parser, Debug)]
#[command(name = "ecg")]
#[command(author, version, about = "Upload ECG images for AI-assisted interpretation", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate images without submitting them
    Check {
        /// Maximum number of images in one batch
        #[arg(long, default_value_t = DEFAULT_MAX_IMAGES)]
        max_images: usize,

        /// Image files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Validate images, then submit them to the relay and print the analysis
    Analyze {
        /// Base URL of the relay
        #[arg(long, env = "ECG_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        relay_url: String,

        /// Maximum number of images in one batch
        #[arg(long, default_value_t = DEFAULT_MAX_IMAGES)]
        max_images: usize,

        /// Image files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays the rendered screen
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ecg_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    let ok = match args.command {
        Command::Check { max_images, files } => {
            let candidates = files::load_candidates(&files).await?;
            let validator = ImageValidator::new().with_max_images(max_images);
            commands::check(candidates, validator, &mut stdout, &mut stderr)?
        }
        Command::Analyze {
            relay_url,
            max_images,
            files,
        } => {
            let candidates = files::load_candidates(&files).await?;
            let validator = ImageValidator::new().with_max_images(max_images);
            let client = RelayClient::new(&relay_url);
            commands::analyze(candidates, validator, &client, &mut stdout, &mut stderr).await?
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
