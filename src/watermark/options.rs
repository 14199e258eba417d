use super::types::{AlignX, AlignY, Dimension, Offset, OutputFormat};

/// Resolved settings for one composition. Built by [`Watermark`](super::Watermark)
/// once every setter has validated, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Multiplier applied to the watermark's alpha channel, 0..=1
    pub opacity: f64,
    pub width: Dimension,
    pub height: Dimension,
    pub align_x: AlignX,
    pub align_y: AlignY,
    pub offset_x: Offset,
    pub offset_y: Offset,
    pub output_format: OutputFormat,
    /// Encoder quality, only honoured by JPEG
    pub quality: u8,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            opacity: 0.3,
            width: Dimension::Percent(80.0),
            height: Dimension::Auto,
            align_x: AlignX::Center,
            align_y: AlignY::Middle,
            offset_x: Offset::Pixels(0),
            offset_y: Offset::Pixels(0),
            output_format: OutputFormat::Jpeg,
            quality: 100,
        }
    }
}
