//! Source tree scanning and plan generation.
//!
//! Phase 1 of a run. Walks the source tree depth-first, resolves the
//! effective [`Config`] of every directory, and classifies every file,
//! producing a [`Plan`] that [`process`](crate::process) executes.
//!
//! Scanning never writes anything. Configuration problems anywhere in the
//! tree (a missing or malformed `config.json`) abort the scan, so a broken
//! tree produces no output at all rather than a half-written target.
//!
//! ## Configuration threading
//!
//! The effective configuration is passed down the recursion as a plain
//! argument. A directory with its own `config.json` starts a fresh value for
//! its subtree; every other directory shares its parent's [`Rc`]. Siblings
//! never see each other's configuration.
//!
//! ```text
//! root/config.json     →  root, root/sub, root/sub/deeper
//! root/sub2/config.json →  root/sub2 (root's config is ignored here)
//! ```
//!
//! ## Ordering
//!
//! Entries are visited in file-name order, so plans, outputs and progress
//! output are reproducible across filesystems. Directories appear in the
//! plan in pre-order: a parent before its children.
//!
//! Symlinked directories are not descended into. Symlinked files are
//! classified like regular files.

use crate::classify::{FileKind, classify};
use crate::config::{self, CONFIG_FILENAME, Config, ConfigError, ConfigOrigin};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Source is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Everything a run will do, resolved up front.
#[derive(Debug)]
pub struct Plan {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    /// Directories in depth-first pre-order.
    pub directories: Vec<DirectoryPlan>,
    pub warnings: Vec<ScanWarning>,
}

impl Plan {
    pub fn image_count(&self) -> usize {
        self.directories.iter().map(|d| d.images.len()).sum()
    }

    pub fn ignored_count(&self) -> usize {
        self.directories.iter().map(|d| d.ignored.len()).sum()
    }
}

/// One source directory and what to do with its files.
#[derive(Debug)]
pub struct DirectoryPlan {
    /// Absolute or caller-relative source directory.
    pub source: PathBuf,
    /// Mirrored directory in the target tree.
    pub target: PathBuf,
    /// Path relative to the source root (empty for the root itself).
    pub relative: PathBuf,
    pub config: Rc<Config>,
    pub origin: ConfigOrigin,
    pub images: Vec<PathBuf>,
    pub passthrough: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
}

/// Non-fatal findings surfaced before processing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// Several images in one directory share a file stem, so their outputs
    /// land on the same paths. The last one in name order wins.
    StemCollision {
        directory: PathBuf,
        stem: String,
        files: Vec<PathBuf>,
    },
}

/// Scan `source` into a plan that mirrors it under `target`.
///
/// `default` applies wherever no `config.json` exists on the path from the
/// root down. Pass `None` to require one at the root (or in every branch).
pub fn scan(source: &Path, target: &Path, default: Option<&Config>) -> Result<Plan, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::NotADirectory(source.to_path_buf()));
    }

    let mut plan = Plan {
        source_root: source.to_path_buf(),
        target_root: target.to_path_buf(),
        directories: Vec::new(),
        warnings: Vec::new(),
    };
    let default = default.map(|c| Rc::new(c.clone()));

    scan_directory(source, target, Path::new(""), default.as_ref(), &mut plan)?;
    Ok(plan)
}

fn scan_directory(
    source: &Path,
    target: &Path,
    relative: &Path,
    inherited: Option<&Rc<Config>>,
    plan: &mut Plan,
) -> Result<(), ScanError> {
    let effective = config::resolve(source, inherited)?;

    let mut images = Vec::new();
    let mut passthrough = Vec::new();
    let mut ignored = Vec::new();
    let mut subdirs: Vec<OsString> = Vec::new();

    let entries = WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadDir {
            path: source.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            subdirs.push(entry.file_name().to_os_string());
            continue;
        }
        if entry.file_type().is_symlink() && !path.is_file() {
            ignored.push(path.to_path_buf());
            continue;
        }
        if entry.file_name() == CONFIG_FILENAME {
            continue;
        }

        match classify(path) {
            FileKind::Image => images.push(path.to_path_buf()),
            FileKind::Passthrough => passthrough.push(path.to_path_buf()),
            FileKind::Ignored => ignored.push(path.to_path_buf()),
        }
    }

    plan.warnings.extend(stem_collisions(relative, &images));
    plan.directories.push(DirectoryPlan {
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        relative: relative.to_path_buf(),
        config: Rc::clone(&effective.config),
        origin: effective.origin,
        images,
        passthrough,
        ignored,
    });

    for name in subdirs {
        scan_directory(
            &source.join(&name),
            &target.join(&name),
            &relative.join(&name),
            Some(&effective.config),
            plan,
        )?;
    }

    Ok(())
}

/// Find images whose outputs would overwrite each other.
fn stem_collisions(relative: &Path, images: &[PathBuf]) -> Vec<ScanWarning> {
    let mut by_stem: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for image in images {
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        by_stem.entry(stem).or_default().push(image.clone());
    }

    by_stem
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(stem, files)| ScanWarning::StemCollision {
            directory: relative.to_path_buf(),
            stem,
            files,
        })
        .collect()
}
