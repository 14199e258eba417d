use image::{Rgba, RgbaImage};

/// Scale one pixel's alpha by `factor`; colour channels are kept.
///
/// Fully transparent pixels are returned untouched.
#[inline]
pub fn scale_alpha(pixel: Rgba<u8>, factor: f64) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    if a == 0 {
        return pixel;
    }
    let factor = clamp_opacity(factor);
    let alpha = (a as f64 * factor).round() as u8;
    Rgba([r, g, b, alpha])
}

/// Copy of `image` with every pixel's alpha multiplied by `opacity`.
/// Opacity outside 0..=1 is clamped.
pub fn apply_opacity(image: &RgbaImage, opacity: f64) -> RgbaImage {
    let mut faded = image.clone();
    for pixel in faded.pixels_mut() {
        *pixel = scale_alpha(*pixel, opacity);
    }
    faded
}

fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        return 0.0;
    }
    opacity.clamp(0.0, 1.0)
}
