//! High-level image operations.
//!
//! These functions combine calculations with backend execution.

use super::backend::{Dimensions, ImageBackend, RasterImage};
use super::calculations::{MAX_OUTPUT_PIXELS, scaled_dimensions};
use super::params::ResizeParams;
use crate::config::SizeDirective;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResizeError {
    #[error(
        "{directive} of a {width}x{height} image exceeds {} pixels",
        MAX_OUTPUT_PIXELS
    )]
    TooLarge {
        width: u32,
        height: u32,
        directive: SizeDirective,
    },
}

/// Resize a decoded image according to a size directive.
///
/// [`SizeDirective::Original`] borrows the input untouched. So does any
/// directive whose computed dimensions equal the source's, since resampling
/// to the same size would only spend time. Everything else is resampled
/// through the backend. Targets too large to allocate are refused before the
/// backend sees them.
pub fn resize_image<'a>(
    backend: &impl ImageBackend,
    image: &'a RasterImage,
    directive: SizeDirective,
) -> Result<Cow<'a, RasterImage>, ResizeError> {
    let original = Dimensions::of(image);
    let (width, height) =
        scaled_dimensions(original.into(), directive).ok_or(ResizeError::TooLarge {
            width: original.width,
            height: original.height,
            directive,
        })?;
    if (width, height) == (original.width, original.height) {
        return Ok(Cow::Borrowed(image));
    }
    Ok(Cow::Owned(
        backend.resize(image, &ResizeParams::new(width, height)),
    ))
}
