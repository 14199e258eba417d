use image::{DynamicImage, codecs::gif::GifEncoder};
use std::io::Write;

use crate::watermark::WatermarkError;

/// Write image as a single-frame GIF. Colours are quantized by the encoder.
pub fn write<W: Write>(image: &DynamicImage, output: W) -> Result<(), WatermarkError> {
    let rgba = image.to_rgba8();
    // The trailer is written when the encoder is dropped
    let mut encoder = GifEncoder::new(output);
    encoder.encode(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
