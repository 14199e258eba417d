// Watermark module - places a faded watermark image onto a base image
mod composite;
mod error;
pub mod formats;
mod handlers;
mod opacity;
mod options;
mod output;
mod placement;
mod types;

pub use composite::composite;
pub use error::{ConfigurationError, WatermarkError};
pub use handlers::{SharedWatermarker, Watermarker, watermark_handler};
pub use opacity::{apply_opacity, scale_alpha};
pub use options::WatermarkOptions;
pub use output::{backup_original, ensure_writable_dir, output_path};
pub use placement::{MAX_BASE_MULTIPLE, PixelRect, Placement, resolve_placement};
pub use types::{AlignX, AlignY, Dimension, LengthValue, Offset, OutputFormat};

use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Encoded image ready to be sent somewhere other than the filesystem
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl Rendered {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Builder for one watermarking job.
///
/// Every setter validates its input straight away. Failures are recorded
/// rather than returned so calls can be chained; [`Watermark::save`] and
/// [`Watermark::show`] refuse to decode anything while a failure is recorded
/// and report all of them at once.
///
/// ```no_run
/// use overmark::watermark::{AlignX, AlignY, Dimension, Watermark};
///
/// let written = Watermark::new()
///     .original("photos/beach.jpg")
///     .watermark("logo.png")
///     .opacity(0.5)
///     .width(Dimension::Percent(30.0))
///     .align_x(AlignX::Right)
///     .align_y(AlignY::Bottom)
///     .save()?;
/// # Ok::<(), overmark::watermark::WatermarkError>(())
/// ```
#[derive(Debug, Default)]
pub struct Watermark {
    original: Option<PathBuf>,
    watermark: Option<PathBuf>,
    destination_path: Option<PathBuf>,
    destination_filename: Option<String>,
    backup_path: Option<PathBuf>,
    options: WatermarkOptions,
    debug: bool,
    errors: Vec<WatermarkError>,
}

impl Watermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image the watermark is drawn onto
    pub fn original(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match formats::detect_format(path) {
            Ok(_) => self.original = Some(path.to_path_buf()),
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Image drawn on top of the original
    pub fn watermark(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match formats::detect_format(path) {
            Ok(_) => self.watermark = Some(path.to_path_buf()),
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Directory the result is written to; defaults to the original's directory
    pub fn destination_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Err(e) = output::ensure_writable_dir(path) {
            self.errors.push(e);
        }
        self.destination_path = Some(path.to_path_buf());
        self
    }

    /// File name of the result without extension; defaults to the original's stem
    pub fn destination_filename(mut self, name: impl Into<String>) -> Self {
        self.destination_filename = Some(name.into());
        self
    }

    /// Directory that receives a copy of the untouched original before saving
    pub fn backup_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Err(e) = output::ensure_writable_dir(path) {
            self.errors.push(e);
        }
        self.backup_path = Some(path.to_path_buf());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        if opacity.is_finite() {
            self.options.opacity = opacity;
        } else {
            self.errors.push(WatermarkError::invalid_config(format!(
                "Opacity must be a number between 0 and 1: {}",
                opacity
            )));
        }
        self
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.options.width = width;
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.options.height = height;
        self
    }

    pub fn align_x(mut self, align: AlignX) -> Self {
        self.options.align_x = align;
        self
    }

    pub fn align_y(mut self, align: AlignY) -> Self {
        self.options.align_y = align;
        self
    }

    pub fn offset_x(mut self, offset: Offset) -> Self {
        self.options.offset_x = offset;
        self
    }

    pub fn offset_y(mut self, offset: Offset) -> Self {
        self.options.offset_y = offset;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.options.output_format = format;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        if quality > 100 {
            self.errors.push(WatermarkError::invalid_config(format!(
                "Quality must be between 0 and 100: {}",
                quality
            )));
        } else {
            self.options.quality = quality;
        }
        self
    }

    /// Report configuration errors at error level instead of debug level
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }

    pub fn errors(&self) -> &[WatermarkError] {
        &self.errors
    }

    /// Composite and write the result to disk, returning the written path
    pub fn save(self) -> Result<PathBuf, WatermarkError> {
        let job = self.validated()?;

        let image = job.render()?;
        let target = output::output_path(
            &job.original,
            job.destination_path.as_deref(),
            job.destination_filename.as_deref(),
            job.options.output_format,
        );

        if let Some(backup_dir) = &job.backup_path {
            output::backup_original(&job.original, backup_dir)?;
        }

        formats::save(
            &image,
            job.options.output_format,
            job.options.quality,
            &target,
        )?;
        info!("Watermarked {:?} written to {:?}", job.original, target);

        Ok(target)
    }

    /// Composite and encode the result in memory
    pub fn show(self) -> Result<Rendered, WatermarkError> {
        let job = self.validated()?;

        let image = job.render()?;
        let bytes = formats::encode(&image, job.options.output_format, job.options.quality)?;

        Ok(Rendered {
            bytes,
            format: job.options.output_format,
        })
    }

    fn validated(mut self) -> Result<Job, WatermarkError> {
        if self.original.is_none() {
            self.errors
                .push(WatermarkError::invalid_config("No usable original image set"));
        }
        if self.watermark.is_none() {
            self.errors
                .push(WatermarkError::invalid_config("No usable watermark image set"));
        }
        if let (Some(original), Some(backup)) = (&self.original, &self.backup_path) {
            let origin_dir = output::original_directory(original);
            if output::same_directory(&origin_dir, backup) {
                self.errors.push(WatermarkError::invalid_config(format!(
                    "Origin path {:?} and backup path {:?} cannot be the same",
                    origin_dir, backup
                )));
            }
        }

        if !self.errors.is_empty() {
            return Err(self.reject());
        }

        match (self.original, self.watermark) {
            (Some(original), Some(watermark)) => Ok(Job {
                original,
                watermark,
                destination_path: self.destination_path,
                destination_filename: self.destination_filename,
                backup_path: self.backup_path,
                options: self.options,
            }),
            _ => Err(WatermarkError::invalid_config(
                "Original and watermark images are required",
            )),
        }
    }

    fn reject(self) -> WatermarkError {
        for e in &self.errors {
            if self.debug {
                error!("Watermark configuration error: {}", e);
            } else {
                debug!("Watermark configuration error: {}", e);
            }
        }
        WatermarkError::Configuration(ConfigurationError {
            errors: self.errors,
        })
    }
}

/// Fully validated job, only built once no errors remain
struct Job {
    original: PathBuf,
    watermark: PathBuf,
    destination_path: Option<PathBuf>,
    destination_filename: Option<String>,
    backup_path: Option<PathBuf>,
    options: WatermarkOptions,
}

impl Job {
    fn render(&self) -> Result<RgbaImage, WatermarkError> {
        let base = formats::decode(&self.original)?;
        let watermark = formats::decode(&self.watermark)?;
        composite(base, &watermark, &self.options)
    }
}
