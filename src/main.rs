use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

mod config;
mod error;
mod imaging;
mod logging;
mod remote;
mod state;
mod sweep;
mod ui;
mod upload;

use config::{ConfigError, ExplorerConfig};
use remote::HttpBackend;
use sweep::{SweepError, SweepStep};

/// Explore how SVD compression trades image quality for size
#[derive(Debug, Parser)]
#[command(name = "svd-explorer", version, about)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload an image and save its compression at several slider values
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// Image to upload (PNG, JPG or GIF)
    image: PathBuf,

    /// Slider values to resolve, in order
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "100",
        allow_negative_numbers = true
    )]
    values: Vec<i64>,

    /// Directory the grayscale original and compressed images are written to
    #[arg(long, default_value = "sweep-output")]
    out: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error("GUI error: {0}")]
    Gui(#[from] iced::Error),
}

fn main() {
    logging::init();

    if let Err(err) = run(Cli::parse()) {
        error!("❌ {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend {
        config.backend_url = url;
    }
    let config = config.validate()?;
    let backend = HttpBackend::new(&config.backend_url)?;

    match cli.command {
        None => ui::run(config, backend)?,
        Some(Command::Sweep(args)) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let report = runtime.block_on(sweep::run(
                &backend,
                &config,
                &args.image,
                &args.values,
                &args.out,
            ))?;

            for step in &report.steps {
                match step {
                    SweepStep::Resolved { value, quality, path, .. } => {
                        println!("{:>4} -> {:>3}  {}", value, quality.get(), path.display())
                    }
                    SweepStep::Skipped { value, error } => println!("{:>4} -> skipped: {}", value, error),
                }
            }
            info!("📊 {} remote compression calls", report.remote_calls());
        }
    }

    Ok(())
}
