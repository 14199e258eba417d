use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use std::io::Write;

use crate::watermark::WatermarkError;

/// Write image as JPEG. Quality 0 is raised to 1, the codec's lowest setting.
pub fn write<W: Write>(image: &DynamicImage, output: W, quality: u8) -> Result<(), WatermarkError> {
    // JPEG doesn't support alpha channel, so convert to RGB
    let rgb_image = image.to_rgb8();
    let encoder = JpegEncoder::new_with_quality(output, quality.clamp(1, 100));
    encoder.write_image(
        &rgb_image,
        rgb_image.width(),
        rgb_image.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}
