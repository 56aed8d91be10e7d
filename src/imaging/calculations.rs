//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::config::SizeDirective;

/// Largest resampled output accepted, in pixels (16384 x 16384).
///
/// Directives are unbounded integers, so a careless `config.json` can ask for
/// a raster no machine can allocate. Such outputs are refused instead.
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Calculate output dimensions for a size directive.
///
/// A single scale factor is derived from the governing edge (the shorter
/// edge for [`SizeDirective::ShortEdge`], the longer one for
/// [`SizeDirective::LongEdge`]) and applied to both axes, so the aspect ratio
/// only drifts by rounding. Each result is rounded to the nearest pixel and
/// never drops below 1. Targets larger than the source upscale.
///
/// Returns `None` when a scaled edge does not fit in a `u32` or the result
/// exceeds [`MAX_OUTPUT_PIXELS`].
///
/// # Examples
/// ```
/// # use resize_tree::imaging::scaled_dimensions;
/// # use resize_tree::config::SizeDirective;
/// // 400x300, shorter edge to 128 → 171x128
/// assert_eq!(scaled_dimensions((400, 300), SizeDirective::ShortEdge(128)), Some((171, 128)));
///
/// // 400x300, longer edge to 200 → 200x150
/// assert_eq!(scaled_dimensions((400, 300), SizeDirective::LongEdge(200)), Some((200, 150)));
///
/// // 1x3, shorter edge to 4e9 → far too large
/// assert_eq!(scaled_dimensions((1, 3), SizeDirective::ShortEdge(4_000_000_000)), None);
/// ```
pub fn scaled_dimensions(original: (u32, u32), directive: SizeDirective) -> Option<(u32, u32)> {
    let (width, height) = original;
    if width == 0 || height == 0 {
        return Some(original);
    }

    match directive {
        SizeDirective::Original => Some(original),
        SizeDirective::ShortEdge(target) => scale_to_edge(original, width.min(height), target),
        SizeDirective::LongEdge(target) => scale_to_edge(original, width.max(height), target),
    }
}

fn scale_to_edge((width, height): (u32, u32), edge: u32, target: u32) -> Option<(u32, u32)> {
    let factor = edge as f64 / target as f64;
    let scaled = (scale_axis(width, factor)?, scale_axis(height, factor)?);
    if scaled.0 as u64 * scaled.1 as u64 > MAX_OUTPUT_PIXELS {
        return None;
    }
    Some(scaled)
}

fn scale_axis(value: u32, factor: f64) -> Option<u32> {
    let rounded = (value as f64 / factor).round();
    if rounded > u32::MAX as f64 {
        return None;
    }
    Some((rounded as u32).max(1))
}
