use crate::Config;
use crate::watermark::{WatermarkError, formats};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("No watermark image configured")]
    WatermarkImageNotConfigured,

    #[error("Watermark image unusable: {0}")]
    WatermarkImageUnusable(#[from] WatermarkError),

    #[error("Source directory does not exist: {0:?}")]
    SourceDirectoryMissing(PathBuf),

    #[error("Source directory is not readable: {0}")]
    SourceDirectoryUnreadable(std::io::Error),
}

/// Verify the files `serve` depends on before binding the listener
pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    match &config.watermark.image {
        None => {
            error!("No watermark image configured in [watermark] image");
            errors.push(StartupCheckError::WatermarkImageNotConfigured);
        }
        Some(image) => match formats::detect_format(image) {
            Ok(format) => info!("Watermark image {:?} detected as {}", image, format),
            Err(e) => {
                error!("Watermark image {:?} is unusable: {}", image, e);
                errors.push(StartupCheckError::WatermarkImageUnusable(e));
            }
        },
    }

    let source_dir = &config.serve.source_directory;
    if !source_dir.is_dir() {
        error!("Source directory does not exist: {:?}", source_dir);
        errors.push(StartupCheckError::SourceDirectoryMissing(source_dir.clone()));
    } else {
        match tokio::fs::read_dir(source_dir).await {
            Ok(_) => info!("Source directory is accessible: {:?}", source_dir),
            Err(e) => {
                error!("Source directory is not accessible: {}", e);
                errors.push(StartupCheckError::SourceDirectoryUnreadable(e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
