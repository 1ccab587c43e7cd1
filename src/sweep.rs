//! Headless sweep
//!
//! Uploads a local image, loads its grayscale original, then resolves a
//! list of slider values in order through the same controller and cache the
//! GUI uses, writing every result to an output directory.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ExplorerConfig;
use crate::error::ExploreError;
use crate::remote::RemoteService;
use crate::state::display::HandleRegistry;
use crate::state::explorer::Explorer;
use crate::state::params::Quality;
use crate::upload::{UploadError, UploadFile};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Explore(#[from] ExploreError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one requested slider value
#[derive(Debug, Clone, PartialEq)]
pub enum SweepStep {
    Resolved {
        value: i64,
        quality: Quality,
        cache_hit: bool,
        path: PathBuf,
    },
    Skipped {
        value: i64,
        error: ExploreError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub image: String,
    pub steps: Vec<SweepStep>,
}

impl SweepReport {
    pub fn remote_calls(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, SweepStep::Resolved { cache_hit: false, .. }))
            .count()
    }
}

/// Run a sweep of `values` for the image at `image_path`.
pub async fn run<S>(
    service: &S,
    config: &ExplorerConfig,
    image_path: &Path,
    values: &[i64],
    out_dir: &Path,
) -> Result<SweepReport, SweepError>
where
    S: RemoteService + ?Sized,
{
    // Step 1: Validate and upload
    let file = UploadFile::read(image_path, config.max_upload_bytes).await?;
    let image = service.upload(&file).await?;
    info!("⬆️  Uploaded {} as {}", file.file_name, image);

    // Step 2: Load the grayscale original
    let mut explorer = Explorer::new(HandleRegistry::new(), config.default_quality);
    explorer.open(image.clone());
    explorer.load_original(service).await?;

    create_dir(out_dir).await?;
    if let Some(original) = explorer.original_handle() {
        write_file(&out_dir.join("original.png"), original.bytes()).await?;
    }

    // Step 3: Resolve every value in order
    let mut steps = Vec::with_capacity(values.len());
    for &value in values {
        let cache_hit = Quality::quantize(value)
            .map(|quality| explorer.cache().contains(&image, quality))
            .unwrap_or(false);

        match explorer.resolve_now(value, service).await {
            Ok(quality) => {
                let path = out_dir.join(format!("compressed-{}.png", quality));
                if let Some(handle) = explorer.compressed_handle() {
                    write_file(&path, handle.bytes()).await?;
                }
                info!(
                    "{} {} -> {} values ({})",
                    if cache_hit { "💾" } else { "🌐" },
                    value,
                    quality,
                    explorer.zone().label()
                );
                steps.push(SweepStep::Resolved {
                    value,
                    quality,
                    cache_hit,
                    path,
                });
            }
            Err(error) => {
                warn!("Skipping {}: {}", value, error);
                steps.push(SweepStep::Skipped { value, error });
            }
        }
    }

    info!(
        "{} results cached for {}",
        explorer.cache().entries_for(&image),
        image
    );
    explorer.teardown();

    let report = SweepReport {
        image: image.to_string(),
        steps,
    };
    info!(
        "✅ Sweep complete: {} values, {} remote calls",
        report.steps.len(),
        report.remote_calls()
    );
    Ok(report)
}

async fn create_dir(path: &Path) -> Result<(), SweepError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| SweepError::Write {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SweepError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| SweepError::Write {
            path: path.to_path_buf(),
            source,
        })
}
