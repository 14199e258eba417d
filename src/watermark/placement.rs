use tracing::debug;

use super::error::WatermarkError;
use super::options::WatermarkOptions;
use super::types::{AlignX, AlignY, Dimension};

/// Largest watermark rectangle allowed, as a multiple of the base image on each axis
pub const MAX_BASE_MULTIPLE: f64 = 4.0;

/// Where the watermark lands on the base image, in base-image pixels.
///
/// Values stay fractional; [`Placement::to_pixels`] rounds them when the
/// watermark is actually drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

/// Integer rectangle the watermark is resized into and drawn at.
/// `x` and `y` may be negative or beyond the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

impl Placement {
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            width: (self.width.round() as u32).max(1),
            height: (self.height.round() as u32).max(1),
            x: self.x.round() as i64,
            y: self.y.round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    /// Width drives the scaling. Square watermarks are treated as landscape.
    Landscape,
    /// Height drives the scaling
    Portrait,
}

impl Orientation {
    fn of(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Compute the target size and top-left corner of the watermark
pub fn resolve_placement(
    base_width: u32,
    base_height: u32,
    watermark_width: u32,
    watermark_height: u32,
    options: &WatermarkOptions,
) -> Result<Placement, WatermarkError> {
    if watermark_width == 0 || watermark_height == 0 {
        return Err(WatermarkError::InvalidWatermark {
            width: watermark_width,
            height: watermark_height,
        });
    }

    let offset_x = options.offset_x.resolve(base_width);
    let offset_y = options.offset_y.resolve(base_height);

    let orientation = Orientation::of(watermark_width, watermark_height);
    let (width, height) = match orientation {
        Orientation::Landscape => {
            let width = primary_extent(options.width, base_width, watermark_width);
            let height = secondary_extent(
                options.height,
                base_height,
                watermark_height,
                width,
                watermark_width,
            );
            (width, height)
        }
        Orientation::Portrait => {
            let height = primary_extent(options.height, base_height, watermark_height);
            let width = secondary_extent(
                options.width,
                base_width,
                watermark_width,
                height,
                watermark_height,
            );
            (width, height)
        }
    };

    let base_w = base_width as f64;
    let base_h = base_height as f64;

    if width > base_w * MAX_BASE_MULTIPLE || height > base_h * MAX_BASE_MULTIPLE {
        return Err(WatermarkError::invalid_config(format!(
            "Watermark size {:.0}x{:.0} exceeds {} times the {}x{} image",
            width, height, MAX_BASE_MULTIPLE, base_width, base_height
        )));
    }

    let x = match options.align_x {
        AlignX::Left => offset_x,
        AlignX::Center => base_w / 2.0 - width / 2.0 + offset_x,
        AlignX::Right => base_w - width + offset_x,
    };
    let y = match options.align_y {
        AlignY::Top => offset_y,
        AlignY::Middle => base_h / 2.0 - height / 2.0 + offset_y,
        AlignY::Bottom => base_h - height + offset_y,
    };

    let placement = Placement {
        width,
        height,
        x,
        y,
    };
    debug!(
        "Resolved {:?} watermark {}x{} on {}x{} base: {:?}",
        orientation, watermark_width, watermark_height, base_width, base_height, placement
    );
    Ok(placement)
}

/// Size along the axis that drives scaling; unset means the watermark's own size
fn primary_extent(dimension: Dimension, base_extent: u32, watermark_extent: u32) -> f64 {
    match dimension {
        Dimension::Auto => watermark_extent as f64,
        Dimension::Pixels(px) => px as f64,
        Dimension::Percent(p) => base_extent as f64 * p / 100.0,
    }
}

/// Size along the other axis; unset keeps the watermark's aspect ratio
fn secondary_extent(
    dimension: Dimension,
    base_extent: u32,
    watermark_extent: u32,
    primary: f64,
    watermark_primary: u32,
) -> f64 {
    match dimension {
        Dimension::Auto => watermark_extent as f64 * primary / watermark_primary as f64,
        Dimension::Pixels(px) => px as f64,
        Dimension::Percent(p) => base_extent as f64 * p / 100.0,
    }
}
