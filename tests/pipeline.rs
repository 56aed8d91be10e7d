//! End-to-end runs over real PNG files.
//!
//! Source trees are built in a temp directory with the `image` crate, then
//! run through `process::run`, the same entry point the CLI uses.

use image::{ImageFormat, RgbImage};
use resize_tree::layout::Layout;
use resize_tree::process::{self, FailureKind, ProcessError};
use resize_tree::scan::ScanError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ROOT_CONFIG: &str =
    r#"{"target_sizes": {"small": 128, "big": null}, "target_extensions": ["png"]}"#;

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Build the reference tree:
///
/// ```text
/// src/config.json      small=128 big=original, png
/// src/a.png            400x300
/// src/clip.mp4
/// src/notes.txt
/// src/sub/b.png        300x400 (inherits root config)
/// src/sub2/config.json tiny=-40, webp
/// src/sub2/c.png       400x300
/// ```
fn reference_tree(src: &Path) {
    write_file(&src.join("config.json"), ROOT_CONFIG.as_bytes());
    write_png(&src.join("a.png"), 400, 300);
    write_file(&src.join("clip.mp4"), b"\x00\x00\x00\x18ftypmp42 not really a video");
    write_file(&src.join("notes.txt"), b"ignored");
    write_png(&src.join("sub/b.png"), 300, 400);
    write_file(
        &src.join("sub2/config.json"),
        br#"{"target_sizes": {"tiny": -40}, "target_extensions": ["webp"]}"#,
    );
    write_png(&src.join("sub2/c.png"), 400, 300);
}

fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn reference_tree_produces_expected_outputs() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    reference_tree(&src);

    let summary = process::run(&src, &out, Layout::NameFirst, None).unwrap();

    assert_eq!(
        list_files(&out),
        vec![
            "a/big.png",
            "a/small.png",
            "clip.mp4",
            "sub/b/big.png",
            "sub/b/small.png",
            "sub2/c/tiny.webp",
        ]
    );
    assert_eq!(dimensions(&out.join("a/small.png")), (171, 128));
    assert_eq!(dimensions(&out.join("a/big.png")), (400, 300));
    assert_eq!(dimensions(&out.join("sub/b/small.png")), (128, 171));
    assert_eq!(dimensions(&out.join("sub2/c/tiny.webp")), (40, 30));
    assert_eq!(
        fs::read(out.join("clip.mp4")).unwrap(),
        fs::read(src.join("clip.mp4")).unwrap()
    );

    assert_eq!(summary.images, 3);
    assert_eq!(summary.variants, 5);
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.ignored, 1);
    assert!(summary.failures.is_empty());
}

#[test]
fn size_first_layout_groups_by_label() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_file(&src.join("config.json"), ROOT_CONFIG.as_bytes());
    write_png(&src.join("a.png"), 400, 300);

    process::run(&src, &out, Layout::SizeFirst, None).unwrap();

    assert_eq!(list_files(&out), vec!["big/a.png", "small/a.png"]);
    assert_eq!(dimensions(&out.join("small/a.png")), (171, 128));
}

#[test]
fn missing_root_config_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_png(&src.join("a.png"), 10, 10);

    let result = process::run(&src, &out, Layout::default(), None);

    assert!(matches!(result, Err(ProcessError::Scan(ScanError::Config(_)))));
    assert!(!out.exists());
}

#[test]
fn broken_nested_config_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_file(&src.join("config.json"), ROOT_CONFIG.as_bytes());
    write_png(&src.join("a.png"), 10, 10);
    // Missing target_sizes
    write_file(
        &src.join("zz/config.json"),
        br#"{"target_extensions": ["png"]}"#,
    );
    write_png(&src.join("zz/b.png"), 10, 10);

    let result = process::run(&src, &out, Layout::default(), None);

    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn unknown_output_extension_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_file(
        &src.join("config.json"),
        br#"{"target_sizes": {"s": 10}, "target_extensions": ["bmp"]}"#,
    );
    write_png(&src.join("a.png"), 10, 10);

    let err = process::run(&src, &out, Layout::default(), None).unwrap_err();

    assert!(err.to_string().contains("bmp"), "{err}");
    assert!(!out.exists());
}

#[test]
fn second_run_is_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    reference_tree(&src);

    process::run(&src, &out, Layout::default(), None).unwrap();
    let first: Vec<(String, Vec<u8>)> = list_files(&out)
        .into_iter()
        .map(|f| {
            let bytes = fs::read(out.join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    process::run(&src, &out, Layout::default(), None).unwrap();
    let second: Vec<(String, Vec<u8>)> = list_files(&out)
        .into_iter()
        .map(|f| {
            let bytes = fs::read(out.join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    assert_eq!(first, second);
}

#[test]
fn corrupt_image_is_skipped_and_run_succeeds() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_file(&src.join("config.json"), ROOT_CONFIG.as_bytes());
    write_file(&src.join("broken.png"), b"definitely not a png");
    write_png(&src.join("good.png"), 200, 100);

    let summary = process::run(&src, &out, Layout::default(), None).unwrap();

    assert_eq!(list_files(&out), vec!["good/big.png", "good/small.png"]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Decode);
    assert!(!summary.has_output_failures());
}

#[test]
fn upper_case_extensions_are_processed() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    write_file(
        &src.join("config.json"),
        br#"{"target_sizes": {"thumb": -50}, "target_extensions": ["JPG"]}"#,
    );
    write_png(&src.join("IMG_0001.PNG"), 100, 80);

    process::run(&src, &out, Layout::default(), None).unwrap();

    assert_eq!(list_files(&out), vec!["IMG_0001/thumb.jpg"]);
    assert_eq!(dimensions(&out.join("IMG_0001/thumb.jpg")), (50, 40));
}
