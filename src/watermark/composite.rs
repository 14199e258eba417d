use image::{RgbaImage, imageops::FilterType};
use tracing::debug;

use super::error::WatermarkError;
use super::opacity::apply_opacity;
use super::options::WatermarkOptions;
use super::placement::{PixelRect, resolve_placement};

/// Draw `watermark` onto `base` as configured by `options`.
///
/// The watermark is faded, scaled into its resolved rectangle and alpha
/// blended onto the base. Parts of the rectangle outside the base are
/// clipped; a watermark placed entirely outside leaves the base as it was.
/// The returned image always has the base's dimensions. Rectangles larger than
/// [`MAX_BASE_MULTIPLE`](super::placement::MAX_BASE_MULTIPLE) times the base
/// are rejected with `InvalidConfig` before anything is resampled.
pub fn composite(
    mut base: RgbaImage,
    watermark: &RgbaImage,
    options: &WatermarkOptions,
) -> Result<RgbaImage, WatermarkError> {
    let placement = resolve_placement(
        base.width(),
        base.height(),
        watermark.width(),
        watermark.height(),
        options,
    )?;
    let rect = placement.to_pixels();

    if visible_region(base.width(), base.height(), &rect).is_none() {
        debug!("Watermark at {:?} lies outside the base image, nothing to draw", rect);
        return Ok(base);
    }

    let faded = apply_opacity(watermark, options.opacity);
    let resized = image::imageops::resize(&faded, rect.width, rect.height, FilterType::Triangle);
    image::imageops::overlay(&mut base, &resized, rect.x, rect.y);

    Ok(base)
}

/// Intersection of `rect` with a `width`x`height` image as half-open
/// `(x0, y0, x1, y1)` bounds, or `None` when they do not overlap.
fn visible_region(width: u32, height: u32, rect: &PixelRect) -> Option<(i64, i64, i64, i64)> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.x.saturating_add(rect.width as i64).min(width as i64);
    let y1 = rect.y.saturating_add(rect.height as i64).min(height as i64);

    if x0 >= x1 || y0 >= y1 {
        None
    } else {
        Some((x0, y0, x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_region() {
        let rect = |x, y| PixelRect {
            width: 10,
            height: 10,
            x,
            y,
        };
        assert_eq!(visible_region(100, 50, &rect(5, 5)), Some((5, 5, 15, 15)));
        assert_eq!(visible_region(100, 50, &rect(95, -5)), Some((95, 0, 100, 5)));
        assert_eq!(visible_region(100, 50, &rect(100, 0)), None);
        assert_eq!(visible_region(100, 50, &rect(-10, 0)), None);
    }
}
