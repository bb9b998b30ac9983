//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Sizes
//!
//! ```text
//! 001 500x378
//!     500 × 378 pixels (aspect ratio preserved)
//!     Files: logo-500x378.png
//! 005 200x90
//!     200 × 90 pixels (aspect ratio preserved)
//!     Files: logo-200x90.png, logo-200x90.jpg
//! ```
//!
//! ## Batch
//!
//! ```text
//! Exporting 7 files from 1000 × 400 source
//! 001/007 logo-500x378.png → out/logo-500x378.png (18 KB)
//! 002/007 logo-265x46.png: failed
//!     Encode failed: ...
//! Exported 6 files, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::catalog::SizeSpec;
use crate::export::{ExportEvent, ExportRecord};
use crate::imaging::Dimensions;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn format_dimensions(width: u32, height: u32) -> String {
    format!("{} \u{00d7} {}", width, height)
}

/// Human-readable file size, rounded up to whole kilobytes above 1 KB.
fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

fn format_record(record: &ExportRecord) -> String {
    format!(
        "{} \u{2192} {} ({})",
        record.filename,
        record.path.display(),
        format_bytes(record.bytes)
    )
}

// ============================================================================
// Load
// ============================================================================

/// Format the result of loading an image.
pub fn format_load_output(path: &Path, dims: Dimensions) -> Vec<String> {
    vec![
        format!("Loaded {}", path.display()),
        format!(
            "    Original size: {}",
            format_dimensions(dims.width, dims.height)
        ),
    ]
}

pub fn print_load_output(path: &Path, dims: Dimensions) {
    for line in format_load_output(path, dims) {
        println!("{}", line);
    }
}

/// Notice for the no-file case.
pub fn format_no_image() -> Vec<String> {
    vec!["No image selected; nothing to export".to_string()]
}

pub fn print_no_image() {
    for line in format_no_image() {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Format the size catalog with the filenames each entry produces.
pub fn format_catalog(catalog: &[SizeSpec], prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, spec) in catalog.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), spec.name));
        lines.push(format!(
            "    {} pixels (aspect ratio preserved)",
            format_dimensions(spec.width, spec.height)
        ));
        let files: Vec<String> = spec
            .formats
            .iter()
            .map(|&format| spec.filename(prefix, format))
            .collect();
        lines.push(format!("    Files: {}", files.join(", ")));
    }
    lines
}

pub fn print_catalog(catalog: &[SizeSpec], prefix: &str) {
    for line in format_catalog(catalog, prefix) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single on-demand export.
pub fn format_single_export(record: &ExportRecord) -> Vec<String> {
    vec![format_record(record)]
}

pub fn print_single_export(record: &ExportRecord) {
    for line in format_single_export(record) {
        println!("{}", line);
    }
}

/// Format a single batch progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::BatchStarted { total, source } => vec![format!(
            "Exporting {} files from {} source",
            total,
            format_dimensions(source.width, source.height)
        )],
        ExportEvent::Saved {
            index,
            total,
            record,
        } => vec![format!(
            "{}/{} {}",
            format_index(*index),
            format_index(*total),
            format_record(record)
        )],
        ExportEvent::Failed {
            index,
            total,
            failure,
        } => vec![
            format!(
                "{}/{} {}: failed",
                format_index(*index),
                format_index(*total),
                failure.filename
            ),
            format!("    {}", failure.error),
        ],
        ExportEvent::BatchFinished { saved, failed } => {
            if *failed == 0 {
                vec![format!("Exported {} files", saved)]
            } else {
                vec![format!("Exported {} files, {} failed", saved, failed)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::export::ExportFailure;
    use crate::imaging::OutputFormat;
    use std::path::PathBuf;

    fn record(filename: &str, bytes: usize) -> ExportRecord {
        ExportRecord {
            size: "500x378".to_string(),
            format: OutputFormat::Png,
            filename: filename.to_string(),
            path: PathBuf::from("out").join(filename),
            width: 500,
            height: 378,
            bytes,
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1025), "2 KB");
    }

    #[test]
    fn load_output_shows_original_size() {
        let lines = format_load_output(
            Path::new("logo.png"),
            Dimensions {
                width: 1000,
                height: 400,
            },
        );
        assert_eq!(lines[0], "Loaded logo.png");
        assert_eq!(lines[1], "    Original size: 1000 \u{00d7} 400");
    }

    #[test]
    fn catalog_lists_files_per_size() {
        let lines = format_catalog(&default_catalog(), "logo");
        assert_eq!(lines.len(), 18);
        assert_eq!(lines[0], "001 500x378");
        assert_eq!(lines[1], "    500 \u{00d7} 378 pixels (aspect ratio preserved)");
        assert_eq!(lines[2], "    Files: logo-500x378.png");
        assert_eq!(lines[12], "005 200x90");
        assert_eq!(lines[14], "    Files: logo-200x90.png, logo-200x90.jpg");
    }

    #[test]
    fn batch_started_line() {
        let lines = format_export_event(&ExportEvent::BatchStarted {
            total: 7,
            source: Dimensions {
                width: 1000,
                height: 400,
            },
        });
        assert_eq!(lines, vec!["Exporting 7 files from 1000 \u{00d7} 400 source"]);
    }

    #[test]
    fn saved_line_shows_index_path_and_size() {
        let lines = format_export_event(&ExportEvent::Saved {
            index: 1,
            total: 7,
            record: record("logo-500x378.png", 18 * 1024),
        });
        let expected_path = PathBuf::from("out").join("logo-500x378.png");
        assert_eq!(
            lines,
            vec![format!(
                "001/007 logo-500x378.png \u{2192} {} (18 KB)",
                expected_path.display()
            )]
        );
    }

    #[test]
    fn failed_lines_include_error() {
        let lines = format_export_event(&ExportEvent::Failed {
            index: 2,
            total: 7,
            failure: ExportFailure {
                size: "265x46".to_string(),
                format: OutputFormat::Png,
                filename: "logo-265x46.png".to_string(),
                error: "Encode failed: boom".to_string(),
            },
        });
        assert_eq!(lines[0], "002/007 logo-265x46.png: failed");
        assert_eq!(lines[1], "    Encode failed: boom");
    }

    #[test]
    fn batch_finished_mentions_failures_only_when_present() {
        let ok = format_export_event(&ExportEvent::BatchFinished {
            saved: 7,
            failed: 0,
        });
        assert_eq!(ok, vec!["Exported 7 files"]);
        let partial = format_export_event(&ExportEvent::BatchFinished {
            saved: 6,
            failed: 1,
        });
        assert_eq!(partial, vec!["Exported 6 files, 1 failed"]);
    }
}
