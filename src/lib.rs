//! # resize-tree
//!
//! Mirrors a directory tree of images into a parallel target tree, producing
//! several resized and re-encoded variants of every image. Sizes and output
//! formats come from `config.json` files placed in the source tree; video
//! files are copied unchanged and everything else is ignored.
//!
//! # Architecture: Scan, Then Process
//!
//! A run has two phases:
//!
//! ```text
//! 1. Scan     source/  →  Plan        (configs resolved, files classified)
//! 2. Process  Plan     →  target/     (decode, resize, encode, write, copy)
//! ```
//!
//! Every `config.json` in the tree is read and validated during the scan,
//! before anything is written. A broken config anywhere therefore fails the
//! run with the target tree untouched. Per-file problems (an undecodable
//! image, a failed write) only surface in phase 2 and never stop the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.json` parsing, validation, inheritance by replacement |
//! | [`classify`] | Extension-based split into images, passthrough files, ignored files |
//! | [`layout`] | Where each output lands in the target tree |
//! | [`scan`] | Phase 1: walks the source tree into a [`scan::Plan`] |
//! | [`process`] | Phase 2: executes the plan, reports [`process::ProcessEvent`]s |
//! | [`imaging`] | Resize math and the `image`-crate backend |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Config Replacement, Not Merging
//!
//! A directory's `config.json` applies to that directory and every
//! descendant until another `config.json` appears. The nearer file replaces
//! the inherited one wholesale:
//!
//! ```text
//! source/config.json            ← sizes {small, big}, extensions [png]
//! source/sub/                   ← inherits {small, big} [png]
//! source/sub2/config.json       ← sizes {tiny}, extensions [webp] (only)
//! ```
//!
//! There are no partial overrides, so reading one file tells you exactly what
//! a directory produces.
//!
//! ## Size Directives
//!
//! Each size label maps to `null` (keep the original size), a positive number
//! (scale so the short edge matches) or a negative number (scale so the long
//! edge matches its magnitude). Aspect ratio is always preserved. See
//! [`imaging::scaled_dimensions`].
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and encoding all go through the `image`
//! crate. No ImageMagick, no system libraries: the binary is self-contained.

pub mod classify;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
