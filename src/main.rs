use clap::Parser;
use resize_tree::layout::Layout;
use resize_tree::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "resize-tree")]
#[command(about = "Mirror an image tree into resized, re-encoded variants")]
#[command(long_about = "\
Mirror an image tree into resized, re-encoded variants

Every directory of SOURCE_DIR is mirrored under TARGET_DIR. Each image is
resized once per size label and encoded once per extension; videos are
copied unchanged; everything else is ignored.

Source structure:

  source/
  ├── config.json            # Required at the root
  ├── a.png                  # → target/a/small.png, target/a/big.png
  ├── clip.mp4               # → target/clip.mp4
  ├── sub/                   # No config: inherits the parent's
  │   └── b.jpg
  └── sub2/
      ├── config.json        # Replaces the inherited config entirely
      └── c.tiff

config.json:

  {
    \"target_sizes\": {
      \"small\": 128,        # short edge becomes 128px
      \"wide\": -1024,       # long edge becomes 1024px
      \"big\": null          # original size
    },
    \"target_extensions\": [\"png\", \"webp\"]
  }

Images: png webp jpg jpeg tif tiff
Copied: mp4 webm mov
Output extensions: png jpg jpeg webp tif tiff avif")]
struct Cli {
    /// Directory to read images and config.json files from
    source_dir: PathBuf,

    /// Directory to write the mirrored tree into
    target_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::run(&cli.source_dir, &cli.target_dir, Layout::default(), Some(tx));
    if printer.join().is_err() {
        eprintln!("error: progress printer panicked");
    }

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    output::print_summary(&summary);

    if summary.has_output_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
