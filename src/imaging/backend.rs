//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the raster adapter the walker drives. It
//! exposes exactly three primitives:
//!
//! | Primitive | Signature |
//! |---|---|
//! | decode | `bytes → RasterImage` |
//! | resize | `RasterImage × (w, h, filter) → RasterImage` |
//! | encode | `RasterImage × format → bytes` |
//!
//! Everything around them (reading sources, choosing dimensions, output
//! paths, writing files) lives outside the backend, so a mock can stand in
//! for the real codecs in tests.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{OutputFormat, ResizeParams};
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

/// Decoded pixels, as handed between backend primitives.
pub type RasterImage = DynamicImage;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &RasterImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode an encoded file's bytes.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError>;

    /// Resample to exactly `params.width × params.height`.
    fn resize(&self, image: &RasterImage, params: &ResizeParams) -> RasterImage;

    /// Encode into the given output format.
    fn encode(&self, image: &RasterImage, format: &OutputFormat) -> Result<Vec<u8>, BackendError>;
}
