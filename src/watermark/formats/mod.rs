pub mod gif;
pub mod jpeg;
pub mod png;

use image::{DynamicImage, ImageReader, RgbaImage};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

pub use super::types::OutputFormat;
use super::error::WatermarkError;

/// Enough leading bytes for every signature we accept
const SNIFF_LEN: usize = 16;

/// Identify an input image by its leading bytes, ignoring the file extension.
/// Only JPEG, PNG and GIF are accepted.
pub fn detect_format(path: &Path) -> Result<OutputFormat, WatermarkError> {
    if !path.is_file() {
        return Err(WatermarkError::NotFound(path.to_path_buf()));
    }

    let mut header = Vec::with_capacity(SNIFF_LEN);
    std::fs::File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;

    image::guess_format(&header)
        .ok()
        .and_then(OutputFormat::from_image_format)
        .ok_or_else(|| WatermarkError::InvalidImageFormat(path.to_path_buf()))
}

/// Decode a JPEG, PNG or GIF file into an RGBA buffer
pub fn decode(path: &Path) -> Result<RgbaImage, WatermarkError> {
    let format = detect_format(path)?;
    let image = ImageReader::with_format(
        std::io::BufReader::new(std::fs::File::open(path)?),
        format.image_format(),
    )
    .decode()
    .map_err(|e| {
        debug!("Failed to decode {:?} as {}: {}", path, format, e);
        WatermarkError::InvalidImageFormat(path.to_path_buf())
    })?;

    debug!(
        "Decoded {:?} ({}, {}x{})",
        path,
        format,
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}

/// Encode `image` in `format` into `writer`. `quality` only affects JPEG.
pub fn write<W: Write>(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
    writer: W,
) -> Result<(), WatermarkError> {
    let image = DynamicImage::ImageRgba8(image.clone());
    match format {
        OutputFormat::Jpeg => jpeg::write(&image, writer, quality),
        OutputFormat::Png => png::write(&image, writer),
        OutputFormat::Gif => gif::write(&image, writer),
    }
}

/// Encode `image` into an in-memory buffer
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, WatermarkError> {
    let mut bytes = Vec::new();
    write(image, format, quality, &mut bytes)?;
    debug!("Encoded {} bytes as {}", bytes.len(), format);
    Ok(bytes)
}

/// Encode `image` into the file at `path`, replacing it if present
pub fn save(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
    path: &Path,
) -> Result<(), WatermarkError> {
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    write(image, format, quality, &mut output)?;
    output.flush()?;
    Ok(())
}
