//! Output path layout.
//!
//! Downstream consumers (a static site, typically) address outputs by path,
//! so the layout is a fixed contract. Two conventions exist; a run uses
//! exactly one.
//!
//! ## Name-first (default)
//!
//! One directory per source image, one file per size label and extension:
//!
//! ```text
//! source/trips/a.png   →  target/trips/a/small.png
//!                         target/trips/a/small.webp
//!                         target/trips/a/big.png
//!                         target/trips/a/big.webp
//! ```
//!
//! ## Size-first
//!
//! One directory per size label, files keep the source stem:
//!
//! ```text
//! source/trips/a.png   →  target/trips/small/a.png
//!                         target/trips/big/a.png
//! ```
//!
//! Passthrough files keep their name in both layouts:
//! `source/trips/clip.mp4 → target/trips/clip.mp4`.

use crate::imaging::OutputFormat;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `target/<stem>/<label>.<ext>`
    #[default]
    NameFirst,
    /// `target/<label>/<stem>.<ext>`
    SizeFirst,
}

impl Layout {
    /// Path of one resized, re-encoded variant.
    ///
    /// `target_dir` is the mirrored directory of the source file, `stem` the
    /// source file name without its extension.
    pub fn variant_path(
        self,
        target_dir: &Path,
        stem: &OsStr,
        label: &str,
        format: &OutputFormat,
    ) -> PathBuf {
        match self {
            Layout::NameFirst => target_dir
                .join(stem)
                .join(format!("{label}.{}", format.extension())),
            Layout::SizeFirst => target_dir
                .join(label)
                .join(with_extension(stem, format.extension())),
        }
    }
}

/// Path a passthrough file is copied to.
pub fn passthrough_path(target_dir: &Path, file_name: &OsStr) -> PathBuf {
    target_dir.join(file_name)
}

/// Append `.ext` without treating dots already in `stem` as an extension.
fn with_extension(stem: &OsStr, ext: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    name
}
