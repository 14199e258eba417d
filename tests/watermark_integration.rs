use image::{GenericImageView, ImageBuffer, Rgba, RgbaImage};
use overmark::watermark::{
    AlignX, AlignY, Dimension, Offset, OutputFormat, Watermark, WatermarkOptions, composite,
    resolve_placement,
};
use overmark::{Config, WatermarkConfig};
use tempfile::TempDir;

fn photo(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
}

#[test]
fn test_composite_always_returns_base_dimensions() {
    let watermarks = [
        RgbaImage::from_pixel(300, 100, Rgba([255, 255, 255, 200])),
        RgbaImage::from_pixel(50, 400, Rgba([0, 0, 0, 255])),
        RgbaImage::from_pixel(64, 64, Rgba([10, 200, 10, 90])),
    ];
    let option_sets = [
        WatermarkOptions::default(),
        WatermarkOptions {
            width: Dimension::Auto,
            height: Dimension::Percent(150.0),
            align_x: AlignX::Right,
            align_y: AlignY::Top,
            offset_x: Offset::Percent(-75.0),
            ..WatermarkOptions::default()
        },
        WatermarkOptions {
            width: Dimension::Pixels(1),
            height: Dimension::Pixels(1),
            opacity: 1.0,
            ..WatermarkOptions::default()
        },
    ];

    for watermark in &watermarks {
        for options in &option_sets {
            let result = composite(photo(257, 131), watermark, options).unwrap();
            assert_eq!(result.dimensions(), (257, 131));
        }
    }
}

#[test]
fn test_percent_and_pixel_sizes_agree() {
    let base = photo(1000, 400);
    let watermark = RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]));

    let by_percent = WatermarkOptions {
        width: Dimension::Percent(50.0),
        opacity: 0.8,
        ..WatermarkOptions::default()
    };
    let by_pixels = WatermarkOptions {
        width: Dimension::Pixels(500),
        ..by_percent.clone()
    };

    let placement = resolve_placement(1000, 400, 200, 100, &by_percent).unwrap();
    assert_eq!(placement.width, 500.0);
    assert_eq!(placement.height, 250.0);

    let a = composite(base.clone(), &watermark, &by_percent).unwrap();
    let b = composite(base, &watermark, &by_pixels).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_center_is_midpoint_of_left_and_right() {
    let x_for = |align_x| {
        let options = WatermarkOptions {
            width: Dimension::Pixels(150),
            align_x,
            ..WatermarkOptions::default()
        };
        resolve_placement(640, 480, 300, 90, &options).unwrap().x
    };

    let left = x_for(AlignX::Left);
    let right = x_for(AlignX::Right);
    assert_eq!(left, 0.0);
    assert_eq!(right, 640.0 - 150.0);
    assert_eq!(x_for(AlignX::Center), (left + right) / 2.0);
}

#[test]
fn test_config_file_drives_builder() {
    let temp_dir = TempDir::new().unwrap();
    let original = temp_dir.path().join("portrait.jpg");
    // JPEG has no alpha channel
    image::DynamicImage::ImageRgba8(photo(90, 160))
        .to_rgb8()
        .save(&original)
        .unwrap();
    let logo = temp_dir.path().join("logo.gif");
    RgbaImage::from_pixel(30, 60, Rgba([255, 0, 0, 255]))
        .save(&logo)
        .unwrap();
    let out = temp_dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();

    let toml = format!(
        r#"
[watermark]
image = {logo:?}
opacity = 0.6
height = "25%"
align_y = "bottom"
offset_y = -10
output_format = "png"
destination_path = {out:?}
destination_filename = "signed"
"#
    );
    let config: Config = toml_edit::de::from_str(&toml).unwrap();

    let written = config
        .watermark
        .apply(Watermark::new().original(&original))
        .save()
        .unwrap();

    assert_eq!(written, out.join("signed.png"));
    let saved = image::open(&written).unwrap();
    assert_eq!(saved.dimensions(), (90, 160));
}

#[test]
fn test_show_mode_matches_requested_format() {
    let temp_dir = TempDir::new().unwrap();
    let original = temp_dir.path().join("scene.png");
    photo(64, 48).save(&original).unwrap();
    let logo = temp_dir.path().join("logo.png");
    RgbaImage::from_pixel(16, 8, Rgba([0, 0, 255, 255]))
        .save(&logo)
        .unwrap();

    let settings = WatermarkConfig {
        image: Some(logo),
        output_format: OutputFormat::Jpeg,
        quality: 50,
        ..WatermarkConfig::default()
    };

    let rendered = settings
        .apply_appearance(Watermark::new().original(&original))
        .show()
        .unwrap();

    assert_eq!(rendered.mime_type(), "image/jpeg");
    assert_eq!(
        image::guess_format(&rendered.bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
}
