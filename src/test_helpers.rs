//! Shared test utilities for the resize-tree test suite.
//!
//! Fixture writers that build source trees on disk, and readers that turn a
//! target tree into something `assert_eq!` can compare.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_config(tmp.path(), r#"{"target_sizes": {"s": 128}, "target_extensions": ["png"]}"#);
//! write_mock_image(&tmp.path().join("album/a.png"), 400, 300);
//!
//! // ... run ...
//!
//! assert_eq!(relative_files(&out), vec!["album/a/s.png"]);
//! ```

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::{CONFIG_FILENAME, Config, SizeDirective, TargetSizes};
use crate::imaging::OutputFormat;

// =========================================================================
// Source tree writers
// =========================================================================

/// Write `config.json` into `dir`, creating the directory.
pub fn write_config(dir: &Path, json: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(CONFIG_FILENAME), json).unwrap();
}

/// Write arbitrary bytes, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Create an empty file, creating parent directories.
pub fn touch(path: &Path) {
    write_bytes(path, b"");
}

/// Write a placeholder image the mock backend decodes as `width`x`height`.
pub fn write_mock_image(path: &Path, width: u32, height: u32) {
    write_bytes(path, format!("{width}x{height}").as_bytes());
}

/// Build a config in code, bypassing `config.json`.
pub fn sample_config(sizes: &[(&str, SizeDirective)], extensions: &[&str]) -> Config {
    let target_sizes: TargetSizes = sizes.iter().map(|&(label, d)| (label, d)).collect();
    let target_extensions = extensions
        .iter()
        .map(|ext| OutputFormat::from_extension(ext).unwrap())
        .collect();
    Config::new(target_sizes, target_extensions)
}

/// Set unix permission bits on a file or directory.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

/// Whether permission bits are enforced for this process. They are not for
/// root, so tests relying on them bail out early.
#[cfg(unix)]
pub fn permissions_enforced(locked: &Path) -> bool {
    if locked.is_dir() {
        fs::read_dir(locked).is_err()
    } else {
        fs::read(locked).is_err()
    }
}

// =========================================================================
// Target tree readers
// =========================================================================

/// All files under `root` as sorted, `/`-separated relative paths.
///
/// Returns an empty list when `root` does not exist.
pub fn relative_files(root: &Path) -> Vec<String> {
    snapshot_tree(root).into_iter().map(|(path, _)| path).collect()
}

/// Every file under `root` with its content, sorted by relative path.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<(String, Vec<u8>)> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry.path().strip_prefix(root).unwrap();
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, fs::read(entry.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

/// Read a file written by the mock backend.
pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}
