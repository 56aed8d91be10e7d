//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | `DynamicImage::write_to` (PNG, JPEG, WebP, TIFF, AVIF) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Output formats and resize parameters
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RasterImage};
pub use calculations::scaled_dimensions;
pub use operations::{ResizeError, resize_image};
pub use params::{OutputFormat, RESAMPLE_FILTER, ResizeParams};
pub use rust_backend::RustBackend;
