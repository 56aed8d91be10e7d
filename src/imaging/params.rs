//! Parameter types for image operations.
//!
//! These describe *what* to produce, not *how*. They are the interface
//! between the walker (which decides what outputs a file fans out into) and
//! the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`OutputFormat`]: an output extension from `target_extensions`, mapped to an encoder.
//! - [`ResizeParams`]: target dimensions plus the resampling filter.

use image::ImageFormat;
use image::imageops::FilterType;
use serde::Deserialize;
use std::fmt;

/// Resampling filter used for every resize.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Extensions that can appear in `target_extensions`, with their encoders.
const OUTPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("avif", ImageFormat::Avif),
];

/// An encodable output format, keyed by the extension the user configured.
///
/// The extension is kept (lower-cased) so `jpg` and `jpeg` produce files with
/// the name the user asked for even though they share an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct OutputFormat {
    extension: String,
    format: ImageFormat,
}

impl OutputFormat {
    /// Look up an extension, ignoring ASCII case. Returns `None` for anything
    /// the encoder set does not cover.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_ascii_lowercase();
        OUTPUT_CANDIDATES
            .iter()
            .find(|(candidate, _)| *candidate == lower)
            .map(|(_, format)| Self {
                extension: lower,
                format: *format,
            })
    }

    /// Extensions accepted in `target_extensions`.
    pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
        OUTPUT_CANDIDATES.iter().map(|(ext, _)| *ext)
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn image_format(&self) -> ImageFormat {
        self.format
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_extension(&value).ok_or_else(|| {
            let supported: Vec<&str> = Self::supported_extensions().collect();
            format!(
                "unsupported output extension `{value}` (expected one of: {})",
                supported.join(", ")
            )
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension)
    }
}

/// Parameters for a single resample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub filter: FilterType,
}

impl ResizeParams {
    /// Resize to exact dimensions with the standard [`RESAMPLE_FILTER`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: RESAMPLE_FILTER,
        }
    }
}
