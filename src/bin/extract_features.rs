use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use audio_features::error::log_extract_error;
use audio_features::ExtractError;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (EnvFilter syntax)
const LOG_ENV: &str = "AUDIO_FEATURES_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "extract_features",
    version,
    about = "Print tempo, RMS, MFCC, spectral centroid and zero-crossing rate of an audio file \
             as JSON"
)]
struct Cli {
    /// Audio file to analyse (WAV, FLAC, MP3, AAC/M4A, Ogg Vorbis)
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            match err.downcast_ref::<ExtractError>() {
                Some(extract_err) => {
                    log_extract_error(extract_err, &cli.path.display().to_string());
                    ExitCode::from(extract_err.exit_code())
                }
                None => ExitCode::from(1),
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let record = audio_features::extract(&cli.path)
        .with_context(|| format!("failed to extract features from {}", cli.path.display()))?;

    let json = serde_json::to_string(&record).context("serialize feature record")?;
    println!("{json}");
    debug!(path = %cli.path.display(), tempo = record.tempo, "feature record written");
    Ok(())
}

/// Log to stderr so stdout carries nothing but the JSON record
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
