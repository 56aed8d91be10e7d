//! Plan execution: resizing, re-encoding and copying.
//!
//! Phase 2 of a run. Takes the [`Plan`] from the scan phase and works
//! through it one directory and one file at a time.
//!
//! ## Per-file pipeline
//!
//! ```text
//! image        read → decode → for each size label:  resize
//!                                 for each extension:  encode → write
//! passthrough  copy
//! ```
//!
//! Each source image is decoded once and resized once per size label; every
//! resized raster is encoded once per target extension. Output directories
//! are created immediately before the first write into them, so source
//! directories without processable files leave no trace in the target.
//!
//! ## Failure policy
//!
//! Configuration problems never reach this phase (scanning rejects them).
//! Everything that can still go wrong is per file, recorded as a
//! [`FileFailure`], and processing moves on:
//!
//! | Failure | Effect on the run |
//! |---|---|
//! | unreadable or undecodable source | file skipped, logged, run still succeeds |
//! | oversized target, encode, write or copy error | output missing, logged, run fails at the end |
//!
//! Re-running over the same inputs overwrites outputs in place with
//! identical content.

use crate::config::ConfigOrigin;
use crate::imaging::{Dimensions, ImageBackend, RustBackend, resize_image};
use crate::layout::{Layout, passthrough_path};
use crate::scan::{self, DirectoryPlan, Plan, ScanError, ScanWarning};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Progress events sent while processing.
///
/// Paths are relative to the source root (`source`, `directory`) or the
/// target root (`output`).
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Warning(ScanWarning),
    DirectoryStarted {
        directory: PathBuf,
        origin: ConfigOrigin,
        images: usize,
        passthrough: usize,
    },
    ImageProcessed {
        source: PathBuf,
        dimensions: (u32, u32),
        variants: Vec<VariantRecord>,
    },
    FileCopied {
        source: PathBuf,
        output: PathBuf,
    },
    FileFailed(FileFailure),
}

/// One written output of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub label: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// What went wrong with a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Read,
    Decode,
    Resize,
    Encode,
    Write,
    Copy,
}

impl FailureKind {
    /// Skipped sources are logged but do not fail the run.
    pub fn is_skip(self) -> bool {
        matches!(self, FailureKind::Read | FailureKind::Decode)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Read => "read failed",
            FailureKind::Decode => "decode failed",
            FailureKind::Resize => "resize failed",
            FailureKind::Encode => "encode failed",
            FailureKind::Write => "write failed",
            FailureKind::Copy => "copy failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub kind: FailureKind,
    /// Relative source path.
    pub source: PathBuf,
    /// Relative output path, for failures tied to one output.
    pub output: Option<PathBuf>,
    pub message: String,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub directories: usize,
    /// Images decoded successfully (even if some of their outputs failed).
    pub images: usize,
    pub variants: usize,
    pub copied: usize,
    pub ignored: usize,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    pub fn skipped(&self) -> impl Iterator<Item = &FileFailure> {
        self.failures.iter().filter(|f| f.kind.is_skip())
    }

    pub fn output_failures(&self) -> impl Iterator<Item = &FileFailure> {
        self.failures.iter().filter(|f| !f.kind.is_skip())
    }

    /// True when some output could not be produced. The CLI exits non-zero.
    pub fn has_output_failures(&self) -> bool {
        self.output_failures().next().is_some()
    }
}

/// Scan and process `source` into `target` with the pure Rust backend.
pub fn run(
    source: &Path,
    target: &Path,
    layout: Layout,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let plan = scan::scan(source, target, None)?;
    Ok(process(&plan, layout, &RustBackend::new(), progress))
}

/// Execute a plan using a specific backend (allows testing with mock).
pub fn process(
    plan: &Plan,
    layout: Layout,
    backend: &impl ImageBackend,
    progress: Option<Sender<ProcessEvent>>,
) -> RunSummary {
    let mut run = Run {
        plan,
        layout,
        backend,
        progress,
        summary: RunSummary::default(),
    };

    for warning in &plan.warnings {
        run.emit(ProcessEvent::Warning(warning.clone()));
    }
    for directory in &plan.directories {
        run.process_directory(directory);
    }

    run.summary
}

struct Run<'a, B> {
    plan: &'a Plan,
    layout: Layout,
    backend: &'a B,
    progress: Option<Sender<ProcessEvent>>,
    summary: RunSummary,
}

impl<B: ImageBackend> Run<'_, B> {
    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.progress {
            // A dropped receiver only means nobody is watching.
            tx.send(event).ok();
        }
    }

    fn source_rel(&self, path: &Path) -> PathBuf {
        relative_to(path, &self.plan.source_root)
    }

    fn target_rel(&self, path: &Path) -> PathBuf {
        relative_to(path, &self.plan.target_root)
    }

    fn fail(
        &mut self,
        kind: FailureKind,
        source: &Path,
        output: Option<&PathBuf>,
        message: String,
    ) {
        let failure = FileFailure {
            kind,
            source: self.source_rel(source),
            output: output.map(|o| self.target_rel(o)),
            message,
        };
        self.emit(ProcessEvent::FileFailed(failure.clone()));
        self.summary.failures.push(failure);
    }

    fn process_directory(&mut self, directory: &DirectoryPlan) {
        self.summary.directories += 1;
        self.summary.ignored += directory.ignored.len();
        self.emit(ProcessEvent::DirectoryStarted {
            directory: directory.relative.clone(),
            origin: directory.origin,
            images: directory.images.len(),
            passthrough: directory.passthrough.len(),
        });

        for image in &directory.images {
            self.process_image(directory, image);
        }
        for file in &directory.passthrough {
            self.copy_passthrough(directory, file);
        }
    }

    fn process_image(&mut self, directory: &DirectoryPlan, source: &Path) {
        let bytes = match fs::read(source) {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(FailureKind::Read, source, None, e.to_string()),
        };
        let image = match self.backend.decode(&bytes) {
            Ok(image) => image,
            Err(e) => return self.fail(FailureKind::Decode, source, None, e.to_string()),
        };
        let Some(stem) = source.file_stem() else {
            return;
        };

        let config = &directory.config;
        let mut variants = Vec::with_capacity(config.outputs_per_image());

        for (label, directive) in config.target_sizes.iter() {
            let sized = match resize_image(self.backend, &image, directive) {
                Ok(sized) => sized,
                Err(e) => {
                    self.fail(FailureKind::Resize, source, None, format!("{label}: {e}"));
                    continue;
                }
            };
            let Dimensions { width, height } = Dimensions::of(&sized);

            for format in &config.target_extensions {
                let output = self
                    .layout
                    .variant_path(&directory.target, stem, label, format);

                let encoded = match self.backend.encode(&sized, format) {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        let message = e.to_string();
                        self.fail(FailureKind::Encode, source, Some(&output), message);
                        continue;
                    }
                };
                if let Err(e) = write_output(&output, &encoded) {
                    let message = e.to_string();
                    self.fail(FailureKind::Write, source, Some(&output), message);
                    continue;
                }

                variants.push(VariantRecord {
                    label: label.to_string(),
                    output: self.target_rel(&output),
                    width,
                    height,
                });
            }
        }

        self.summary.images += 1;
        self.summary.variants += variants.len();
        self.emit(ProcessEvent::ImageProcessed {
            source: self.source_rel(source),
            dimensions: Dimensions::of(&image).into(),
            variants,
        });
    }

    fn copy_passthrough(&mut self, directory: &DirectoryPlan, source: &Path) {
        let Some(name) = source.file_name() else {
            return;
        };
        let output = passthrough_path(&directory.target, name);

        let copied =
            fs::create_dir_all(&directory.target).and_then(|_| fs::copy(source, &output));
        match copied {
            Ok(_) => {
                self.summary.copied += 1;
                self.emit(ProcessEvent::FileCopied {
                    source: self.source_rel(source),
                    output: self.target_rel(&output),
                });
            }
            Err(e) => self.fail(FailureKind::Copy, source, Some(&output), e.to_string()),
        }
    }
}

/// Write one output file, creating its directory first.
fn write_output(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
