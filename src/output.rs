//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each directory is a header line; the files processed in it are indented
//! beneath, with one context line per written output. Paths are shown
//! relative to the source or target root.
//!
//! ```text
//! . (config.json, 2 images, 1 other)
//!     a.png 400x300
//!         small: a/small.png (171x128)
//!         big: a/big.png (400x300)
//!     clip.mp4 → clip.mp4
//! sub (inherited config, 1 image)
//!     b.png 300x400
//!         small: sub/b/small.png (128x171)
//! ```
//!
//! Failures and warnings go to stderr:
//!
//! ```text
//! warning: broken.png: decode failed: ... (skipped)
//! error: a.png → a/small.avif: write failed: Permission denied
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` (or `String`) for
//! testability and does no I/O. The `print_*` wrappers
//! write to stdout or stderr.

use crate::config::ConfigOrigin;
use crate::process::{FileFailure, ProcessEvent, RunSummary};
use crate::scan::ScanWarning;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display a relative path, using `.` for the root.
fn display_rel(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        path.display().to_string()
    }
}

/// Format `1 image` / `3 images`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn directory_header(directory: &Path, origin: ConfigOrigin, images: usize, other: usize) -> String {
    let mut details = vec![match origin {
        ConfigOrigin::Local => "config.json".to_string(),
        ConfigOrigin::Inherited => "inherited config".to_string(),
    }];
    if images > 0 {
        details.push(count(images, "image", "images"));
    }
    if other > 0 {
        details.push(count(other, "other", "others"));
    }
    format!("{} ({})", display_rel(directory), details.join(", "))
}

/// Format a per-file failure as a single stderr line.
///
/// Skipped sources are warnings; missing outputs are errors.
pub fn format_failure(failure: &FileFailure) -> String {
    let target = match &failure.output {
        Some(output) => format!("{} \u{2192} {}", failure.source.display(), output.display()),
        None => failure.source.display().to_string(),
    };
    if failure.kind.is_skip() {
        format!(
            "warning: {}: {}: {} (skipped)",
            target, failure.kind, failure.message
        )
    } else {
        format!("error: {}: {}: {}", target, failure.kind, failure.message)
    }
}

pub fn format_warning(warning: &ScanWarning) -> String {
    match warning {
        ScanWarning::StemCollision {
            directory,
            stem,
            files,
        } => {
            let names: Vec<String> = files
                .iter()
                .filter_map(|f| f.file_name())
                .map(|f| f.to_string_lossy().into_owned())
                .collect();
            format!(
                "warning: {}: {} share the name `{}`; outputs of the last one win",
                display_rel(directory),
                names.join(", "),
                stem
            )
        }
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Warning(warning) => vec![format_warning(warning)],
        ProcessEvent::DirectoryStarted {
            directory,
            origin,
            images,
            passthrough,
        } => vec![directory_header(directory, *origin, *images, *passthrough)],
        ProcessEvent::ImageProcessed {
            source,
            dimensions,
            variants,
        } => {
            let name = source
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.display().to_string());
            let mut lines = vec![format!(
                "{}{} {}x{}",
                indent(1),
                name,
                dimensions.0,
                dimensions.1
            )];
            for variant in variants {
                lines.push(format!(
                    "{}{}: {} ({}x{})",
                    indent(2),
                    variant.label,
                    variant.output.display(),
                    variant.width,
                    variant.height
                ));
            }
            lines
        }
        ProcessEvent::FileCopied { source, output } => {
            let name = source
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            vec![format!(
                "{}{} \u{2192} {}",
                indent(1),
                name,
                output.display()
            )]
        }
        ProcessEvent::FileFailed(failure) => vec![format_failure(failure)],
    }
}

/// Whether an event belongs on stderr.
pub fn is_diagnostic(event: &ProcessEvent) -> bool {
    matches!(event, ProcessEvent::Warning(_) | ProcessEvent::FileFailed(_))
}

/// Print a progress event to stdout (or stderr for diagnostics).
pub fn print_process_event(event: &ProcessEvent) {
    let diagnostic = is_diagnostic(event);
    for line in format_process_event(event) {
        if diagnostic {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format the end-of-run summary.
///
/// ```text
/// Processed 12 images into 48 files, copied 2 files, ignored 3 files
/// Skipped 1 unreadable image:
///     broken.png: decode failed: ...
/// ```
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Processed {} into {}, copied {}, ignored {}",
        count(summary.images, "image", "images"),
        count(summary.variants, "file", "files"),
        count(summary.copied, "file", "files"),
        count(summary.ignored, "file", "files"),
    )];

    let skipped: Vec<&FileFailure> = summary.skipped().collect();
    if !skipped.is_empty() {
        lines.push(format!(
            "Skipped {}:",
            count(skipped.len(), "unreadable image", "unreadable images")
        ));
        for failure in skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                failure.source.display(),
                failure.kind
            ));
        }
    }

    let failed: Vec<&FileFailure> = summary.output_failures().collect();
    if !failed.is_empty() {
        lines.push(format!(
            "Failed to write {}:",
            count(failed.len(), "output", "outputs")
        ));
        for failure in failed {
            let path = failure.output.as_deref().unwrap_or(&failure.source);
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                path.display(),
                failure.kind
            ));
        }
    }

    lines
}

/// Print the summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
