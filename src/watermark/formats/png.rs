use image::{DynamicImage, codecs::png::PngEncoder};
use std::io::Write;

use crate::watermark::WatermarkError;

/// Write image as PNG, keeping the alpha channel
pub fn write<W: Write>(image: &DynamicImage, output: W) -> Result<(), WatermarkError> {
    let encoder = PngEncoder::new(output);
    image.write_with_encoder(encoder)?;
    Ok(())
}
