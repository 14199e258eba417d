use crate::watermark::{OutputFormat, WatermarkError, formats};
use image::{GenericImageView, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

fn textured_image(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let noise = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 256;
        Rgba([noise as u8, (x % 256) as u8, (y % 256) as u8, 255])
    })
}

#[test]
fn test_jpeg_quality_changes_size_not_dimensions() {
    let image = textured_image(160, 120);

    let high = formats::encode(&image, OutputFormat::Jpeg, 100).unwrap();
    let low = formats::encode(&image, OutputFormat::Jpeg, 10).unwrap();

    assert!(
        high.len() > low.len(),
        "quality 100 ({} bytes) should be larger than quality 10 ({} bytes)",
        high.len(),
        low.len()
    );

    let high_decoded = image::load_from_memory_with_format(&high, ImageFormat::Jpeg).unwrap();
    let low_decoded = image::load_from_memory_with_format(&low, ImageFormat::Jpeg).unwrap();
    assert_eq!(high_decoded.dimensions(), (160, 120));
    assert_eq!(low_decoded.dimensions(), (160, 120));
}

#[test]
fn test_jpeg_quality_zero_is_accepted() {
    let image = textured_image(32, 32);
    let bytes = formats::encode(&image, OutputFormat::Jpeg, 0).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_png_keeps_alpha() {
    let image = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 77]));

    let bytes = formats::encode(&image, OutputFormat::Png, 100).unwrap();
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .unwrap()
        .to_rgba8();

    assert_eq!(decoded, image);
}

#[test]
fn test_gif_output() {
    let image = textured_image(40, 30);

    let bytes = formats::encode(&image, OutputFormat::Gif, 100).unwrap();

    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Gif);
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Gif).unwrap();
    assert_eq!(decoded.dimensions(), (40, 30));
}

#[test]
fn test_detect_format_reads_content_not_extension() {
    let temp_dir = TempDir::new().unwrap();
    let disguised = temp_dir.path().join("actually_png.jpg");
    textured_image(4, 4)
        .save_with_format(&disguised, ImageFormat::Png)
        .unwrap();

    assert_eq!(formats::detect_format(&disguised).unwrap(), OutputFormat::Png);
}

#[test]
fn test_detect_format_rejects_other_images_and_text() {
    let temp_dir = TempDir::new().unwrap();

    let bmp = temp_dir.path().join("picture.bmp");
    textured_image(4, 4)
        .save_with_format(&bmp, ImageFormat::Bmp)
        .unwrap();
    assert!(matches!(
        formats::detect_format(&bmp),
        Err(WatermarkError::InvalidImageFormat(_))
    ));

    let text = temp_dir.path().join("notes.png");
    std::fs::write(&text, "not an image at all").unwrap();
    assert!(matches!(
        formats::detect_format(&text),
        Err(WatermarkError::InvalidImageFormat(_))
    ));
}

#[test]
fn test_decode_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.png");

    assert!(matches!(
        formats::decode(&missing),
        Err(WatermarkError::NotFound(_))
    ));
}

#[test]
fn test_decode_truncated_image() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("truncated.png");
    let bytes = formats::encode(&textured_image(64, 64), OutputFormat::Png, 100).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(
        formats::decode(&path),
        Err(WatermarkError::InvalidImageFormat(_))
    ));
}

#[test]
fn test_save_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.png");
    let image = textured_image(12, 9);

    formats::save(&image, OutputFormat::Png, 100, &path).unwrap();

    let decoded = formats::decode(&path).unwrap();
    assert_eq!(decoded, image);
}
