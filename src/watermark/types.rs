use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::WatermarkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Gif => "image/gif",
        }
    }

    /// Map a decoded input format onto one we can also write, if any
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::Gif => Some(OutputFormat::Gif),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // An empty format falls back to JPEG
            "" | "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(WatermarkError::invalid_config(format!(
                "Output format is unknown: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.to_string()
    }
}

/// Horizontal anchor of the watermark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlignX {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchor of the watermark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlignY {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl FromStr for AlignX {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(AlignX::Left),
            "center" => Ok(AlignX::Center),
            "right" => Ok(AlignX::Right),
            other => Err(WatermarkError::invalid_config(format!(
                "Unknown horizontal alignment '{}', expected left, center or right",
                other
            ))),
        }
    }
}

impl FromStr for AlignY {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(AlignY::Top),
            "middle" => Ok(AlignY::Middle),
            "bottom" => Ok(AlignY::Bottom),
            other => Err(WatermarkError::invalid_config(format!(
                "Unknown vertical alignment '{}', expected top, middle or bottom",
                other
            ))),
        }
    }
}

impl fmt::Display for AlignX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlignX::Left => "left",
            AlignX::Center => "center",
            AlignX::Right => "right",
        })
    }
}

impl fmt::Display for AlignY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlignY::Top => "top",
            AlignY::Middle => "middle",
            AlignY::Bottom => "bottom",
        })
    }
}

impl TryFrom<String> for AlignX {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for AlignY {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlignX> for String {
    fn from(value: AlignX) -> Self {
        value.to_string()
    }
}

impl From<AlignY> for String {
    fn from(value: AlignY) -> Self {
        value.to_string()
    }
}

/// Raw length as it appears in TOML: `300` or `"33%"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    Integer(i64),
    Text(String),
}

/// Target size of the watermark along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(try_from = "LengthValue", into = "String")]
pub enum Dimension {
    /// Derived from the watermark itself
    #[default]
    Auto,
    Pixels(u32),
    /// Percentage of the base image along the same axis
    Percent(f64),
}

impl Dimension {
    fn validated(self) -> Result<Self, WatermarkError> {
        match self {
            Dimension::Pixels(0) => Err(WatermarkError::invalid_config(
                "Watermark size must be at least one pixel",
            )),
            Dimension::Percent(p) if !p.is_finite() || p <= 0.0 => Err(
                WatermarkError::invalid_config(format!("Watermark size must be positive: {}%", p)),
            ),
            other => Ok(other),
        }
    }
}

impl FromStr for Dimension {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Dimension::Auto);
        }
        let parsed = if let Some(percent) = s.strip_suffix('%') {
            Dimension::Percent(parse_percent(percent, s)?)
        } else {
            let pixels = s.parse::<u32>().map_err(|_| {
                WatermarkError::invalid_config(format!("Invalid watermark size: {}", s))
            })?;
            Dimension::Pixels(pixels)
        };
        parsed.validated()
    }
}

impl TryFrom<LengthValue> for Dimension {
    type Error = WatermarkError;

    fn try_from(value: LengthValue) -> Result<Self, Self::Error> {
        match value {
            LengthValue::Integer(n) => u32::try_from(n)
                .map_err(|_| {
                    WatermarkError::invalid_config(format!("Invalid watermark size: {}", n))
                })
                .and_then(|px| Dimension::Pixels(px).validated()),
            LengthValue::Text(s) => s.parse(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Auto => f.write_str("auto"),
            Dimension::Pixels(px) => write!(f, "{}", px),
            Dimension::Percent(p) => write!(f, "{}%", p),
        }
    }
}

impl From<Dimension> for String {
    fn from(value: Dimension) -> Self {
        value.to_string()
    }
}

/// Signed displacement applied after alignment
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "LengthValue", into = "String")]
pub enum Offset {
    Pixels(i64),
    /// Percentage of the base image along the same axis
    Percent(f64),
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Pixels(0)
    }
}

impl Offset {
    /// Offset in base-image pixels
    pub fn resolve(&self, base_extent: u32) -> f64 {
        match *self {
            Offset::Pixels(px) => px as f64,
            Offset::Percent(p) => base_extent as f64 * p / 100.0,
        }
    }
}

impl FromStr for Offset {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Offset::default());
        }
        if let Some(percent) = s.strip_suffix('%') {
            return Ok(Offset::Percent(parse_percent(percent, s)?));
        }
        s.parse::<i64>()
            .map(Offset::Pixels)
            .map_err(|_| WatermarkError::invalid_config(format!("Invalid offset: {}", s)))
    }
}

impl TryFrom<LengthValue> for Offset {
    type Error = WatermarkError;

    fn try_from(value: LengthValue) -> Result<Self, Self::Error> {
        match value {
            LengthValue::Integer(n) => Ok(Offset::Pixels(n)),
            LengthValue::Text(s) => s.parse(),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Pixels(px) => write!(f, "{}", px),
            Offset::Percent(p) => write!(f, "{}%", p),
        }
    }
}

impl From<Offset> for String {
    fn from(value: Offset) -> Self {
        value.to_string()
    }
}

fn parse_percent(number: &str, original: &str) -> Result<f64, WatermarkError> {
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| WatermarkError::invalid_config(format!("Invalid percentage: {}", original)))
}
