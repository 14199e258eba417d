use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a JPEG, PNG or GIF image: {0}")]
    InvalidImageFormat(PathBuf),

    #[error("Path is not writable: {path} ({reason})")]
    PathNotWritable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Watermark has no pixels ({width}x{height})")]
    InvalidWatermark { width: u32, height: u32 },

    #[error("Could not copy {from} to {to}: {source}")]
    IoFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl WatermarkError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        WatermarkError::InvalidConfig(message.into())
    }
}

/// Every problem recorded while a [`Watermark`](super::Watermark) was configured.
#[derive(Debug)]
pub struct ConfigurationError {
    pub errors: Vec<WatermarkError>,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s): ", self.errors.len())?;
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationError {}
