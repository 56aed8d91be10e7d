//! File classification by extension.
//!
//! Every file the walker meets is one of:
//!
//! | Kind | Extensions | Handling |
//! |---|---|---|
//! | [`FileKind::Image`] | `png webp jpg jpeg tif tiff` | resized, then encoded |
//! | [`FileKind::Passthrough`] | `mp4 webm mov` | copied byte for byte |
//! | [`FileKind::Ignored`] | anything else | neither processed nor copied |
//!
//! Matching ignores ASCII case (`IMG_001.JPG` is an image). These lists are
//! fixed and independent of any `config.json`.

use std::path::Path;

/// Extensions decoded and fanned out into resized variants.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "webp", "jpg", "jpeg", "tif", "tiff"];

/// Extensions copied verbatim into the target tree.
pub const PASSTHROUGH_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Passthrough,
    Ignored,
}

/// Classify a file by its extension.
pub fn classify(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Ignored;
    };
    let matches = |list: &[&str]| list.iter().any(|known| known.eq_ignore_ascii_case(ext));

    if matches(IMAGE_EXTENSIONS) {
        FileKind::Image
    } else if matches(PASSTHROUGH_EXTENSIONS) {
        FileKind::Passthrough
    } else {
        FileKind::Ignored
    }
}
