use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use shotscan::export::{self, ExportTargets};
use shotscan::{Pipeline, ShotscanConfig};

/// Extract text from a screenshot, preferring a QR code over OCR
#[derive(Debug, Parser)]
#[command(name = "shotscan", version, about)]
struct Cli {
    /// Language(s) for OCR (e.g., eng, hin, or eng+hin for multiple languages)
    #[arg(long = "lang", value_name = "LANGUAGE")]
    language: Option<String>,

    /// Disable QR code detection and extraction
    #[arg(long)]
    disable_qr: bool,

    /// Config file to use instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the screenshot at this path instead of a temporary file
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Save the extracted text to a file
    #[arg(long, value_name = "PATH")]
    save_text: Option<PathBuf>,

    /// Save the screenshot (defaults to a timestamped file in Pictures)
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    save_image: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ShotscanConfig> {
    let mut config = match &cli.config {
        Some(path) => ShotscanConfig::load_from(path)?,
        None => ShotscanConfig::load(),
    };
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if cli.disable_qr {
        config.qr_enabled = false;
    }
    if let Some(image) = &cli.image {
        config.image_path = Some(image.clone());
    }
    Ok(config)
}

/// Returns whether the pipeline produced text
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("Configuration written to {}", path.display());
        return Ok(true);
    }

    // Removed on drop; the capture tool creates the file itself
    let temp_dir;
    let image_path = match &config.image_path {
        Some(path) => path.clone(),
        None => {
            temp_dir = tempfile::Builder::new()
                .prefix("shotscan-")
                .tempdir()
                .context("Failed to create temporary screenshot directory")?;
            temp_dir.path().join("screenshot.png")
        }
    };

    let pipeline = Pipeline::from_config(&config, image_path);
    let outcome = pipeline.run(config.qr_enabled, &config.language);
    log::info!("{}", outcome.status_message());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if let Some(text) = outcome.text() {
            println!("{}", text);
        }
        eprintln!("{}", outcome.status_message());
    }

    let targets = ExportTargets {
        text: cli.save_text.as_deref(),
        image: cli
            .save_image
            .as_deref()
            .map(|dest| (!dest.as_os_str().is_empty()).then_some(dest)),
    };
    if let Some(saved) = export::export_outcome(&outcome, pipeline.image_path(), targets)? {
        eprintln!("Screenshot saved to {}", saved.display());
    }

    Ok(outcome.is_success())
}
