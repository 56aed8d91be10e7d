//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP, TIFF) | `image::load_from_memory` (format sniffed from content) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → PNG, JPEG, WebP, TIFF | `image::DynamicImage::write_to` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e) via `write_to` |
//!
//! Encoders only accept some pixel layouts: JPEG has no alpha channel, and
//! the WebP and AVIF encoders take 8-bit RGB(A) only. Rasters are converted
//! just before encoding; the decoded source is never modified.

use super::backend::{BackendError, ImageBackend, RasterImage};
use super::params::{OutputFormat, ResizeParams};
use image::{ColorType, DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a raster into a pixel layout the target encoder supports.
fn prepare_for_encoder(image: &RasterImage, format: ImageFormat) -> Cow<'_, RasterImage> {
    let color = image.color();
    let is_float = matches!(color, ColorType::Rgb32F | ColorType::Rgba32F);
    let eight_bit_only = matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Avif
    );

    if !eight_bit_only && !is_float {
        return Cow::Borrowed(image);
    }

    let keep_alpha = color.has_alpha() && format != ImageFormat::Jpeg;
    match (keep_alpha, color) {
        (true, ColorType::Rgba8) | (false, ColorType::Rgb8) => Cow::Borrowed(image),
        // JPEG takes grayscale as-is
        (false, ColorType::L8) if format == ImageFormat::Jpeg => Cow::Borrowed(image),
        (true, _) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        (false, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn resize(&self, image: &RasterImage, params: &ResizeParams) -> RasterImage {
        image.resize_exact(params.width, params.height, params.filter)
    }

    fn encode(&self, image: &RasterImage, format: &OutputFormat) -> Result<Vec<u8>, BackendError> {
        let prepared = prepare_for_encoder(image, format.image_format());
        let mut buffer = Cursor::new(Vec::new());
        prepared
            .write_to(&mut buffer, format.image_format())
            .map_err(|e| BackendError::Encode(format!("{format}: {e}")))?;
        Ok(buffer.into_inner())
    }
}
