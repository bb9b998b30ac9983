//! Exporting rendered variants to disk.
//!
//! Every export runs the same ordered pipeline:
//!
//! ```text
//! plan (letterbox math) → render (canvas) → encode (png/jpg bytes) → save
//! ```
//!
//! Each stage returns a `Result`, and a failure stops only the export it
//! belongs to.
//!
//! ## Single vs. batch
//!
//! - [`export_single`] renders one `(size, format)` pair from the session's
//!   current image. It ignores the processing flag.
//! - [`export_batch`] walks the whole catalog through a [`BatchRun`]:
//!   catalog order first, then format order within each size, pausing for
//!   [`ExportSettings::delay`] between consecutive saves. A failed export is
//!   reported and the batch carries on.
//!
//! ## Output Structure
//!
//! ```text
//! <output_dir>/
//! ├── logo-500x378.png
//! ├── logo-265x46.png
//! ├── logo-398x161.png
//! ├── logo-100x50.png
//! ├── logo-200x90.png
//! ├── logo-200x90.jpg
//! └── logo-1920x1110.jpg
//! ```

use crate::catalog::{self, SizeSpec};
use crate::config::ExportConfig;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, OutputFormat, Quality, SourceImage, render_variant,
};
use crate::session::Session;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("No image loaded")]
    NoImage,
    #[error("A batch export is already running")]
    BatchInProgress,
    #[error("Unknown size '{0}'")]
    UnknownSize(String),
    #[error("Size '{size}' is not exported as {format}")]
    UnsupportedFormat { size: String, format: OutputFormat },
}

/// Where encoded files end up.
///
/// Implementations must not hold on to any handle after `save` returns.
pub trait SaveTarget {
    /// Persist `bytes` under `filename`, returning the final location.
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves into a directory, creating it on first use.
///
/// Existing files with the same name are overwritten.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let mut file = File::create(&path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(path)
    }
}

/// Knobs shared by single and batch export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Filename prefix (`logo` → `logo-500x378.png`).
    pub prefix: String,
    /// JPEG quality.
    pub quality: Quality,
    /// Pause between consecutive batch exports.
    pub delay: Duration,
}

impl ExportSettings {
    /// Build settings from the `[export]` config section.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            quality: Quality::new(config.jpeg_quality),
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// One file written by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub size: String,
    pub format: OutputFormat,
    pub filename: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// One export that did not make it to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFailure {
    pub size: String,
    pub format: OutputFormat,
    pub filename: String,
    pub error: String,
}

pub type ExportOutcome = Result<ExportRecord, ExportFailure>;

/// Progress events emitted during a batch.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    BatchStarted {
        total: usize,
        source: Dimensions,
    },
    Saved {
        index: usize,
        total: usize,
        record: ExportRecord,
    },
    Failed {
        index: usize,
        total: usize,
        failure: ExportFailure,
    },
    BatchFinished {
        saved: usize,
        failed: usize,
    },
}

/// Everything a batch produced.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub saved: Vec<ExportRecord>,
    pub failed: Vec<ExportFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render, encode, and save one `(spec, format)` pair.
pub fn export_one(
    backend: &impl ImageBackend,
    target: &impl SaveTarget,
    source: &SourceImage,
    spec: &SizeSpec,
    format: OutputFormat,
    settings: &ExportSettings,
) -> Result<ExportRecord, ExportError> {
    let filename = spec.filename(&settings.prefix, format);
    log::debug!(
        "rendering {} from {}x{}",
        filename,
        source.width(),
        source.height()
    );

    let bytes = render_variant(backend, source, spec.target(), format, settings.quality)?;
    let path = target.save(&filename, &bytes)?;

    Ok(ExportRecord {
        size: spec.name.clone(),
        format,
        filename,
        path,
        width: spec.width,
        height: spec.height,
        bytes: bytes.len(),
    })
}

/// Export one named size in one format from the session's current image.
pub fn export_single(
    session: &Session,
    backend: &impl ImageBackend,
    target: &impl SaveTarget,
    catalog: &[SizeSpec],
    size: &str,
    format: OutputFormat,
    settings: &ExportSettings,
) -> Result<ExportRecord, ExportError> {
    let source = session.image().ok_or(ExportError::NoImage)?;
    let spec =
        catalog::find(catalog, size).ok_or_else(|| ExportError::UnknownSize(size.to_string()))?;
    if !spec.supports(format) {
        return Err(ExportError::UnsupportedFormat {
            size: spec.name.clone(),
            format,
        });
    }
    export_one(backend, target, source, spec, format, settings)
}

/// A batch in progress.
///
/// Owns the source snapshot and the ordered job list; each
/// [`step`](Self::step) performs exactly one export.
#[derive(Debug)]
pub struct BatchRun {
    source: Arc<SourceImage>,
    jobs: Vec<(SizeSpec, OutputFormat)>,
    next: usize,
}

impl BatchRun {
    pub fn new(source: Arc<SourceImage>, catalog: &[SizeSpec]) -> Self {
        let jobs = catalog::export_jobs(catalog)
            .map(|(spec, format)| (spec.clone(), format))
            .collect();
        Self {
            source,
            jobs,
            next: 0,
        }
    }

    /// The image this batch renders from.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Number of exports attempted so far.
    pub fn completed(&self) -> usize {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.jobs.len()
    }

    /// Run the next export, or return `None` once every job has run.
    ///
    /// Sleeps for `settings.delay` before every export except the first.
    pub fn step(
        &mut self,
        backend: &impl ImageBackend,
        target: &impl SaveTarget,
        settings: &ExportSettings,
    ) -> Option<ExportOutcome> {
        let (spec, format) = self.jobs.get(self.next)?;
        if self.next > 0 && !settings.delay.is_zero() {
            std::thread::sleep(settings.delay);
        }
        self.next += 1;

        let outcome = export_one(backend, target, &self.source, spec, *format, settings)
            .map_err(|e| {
                let filename = spec.filename(&settings.prefix, *format);
                log::warn!("export of {} failed: {}", filename, e);
                ExportFailure {
                    size: spec.name.clone(),
                    format: *format,
                    filename,
                    error: e.to_string(),
                }
            });
        Some(outcome)
    }
}

/// Export every catalog entry from the session's current image.
///
/// The image is captured once when the batch starts. The session's
/// processing flag is held for the whole run and cleared afterwards,
/// regardless of individual failures. Progress goes to `events` if given.
pub fn export_batch(
    session: &mut Session,
    backend: &impl ImageBackend,
    target: &impl SaveTarget,
    catalog: &[SizeSpec],
    settings: &ExportSettings,
    events: Option<Sender<ExportEvent>>,
) -> Result<BatchReport, ExportError> {
    let mut run = session.start_batch(catalog)?;
    let total = run.total();
    log::info!("batch export of {} files started", total);
    emit(
        &events,
        ExportEvent::BatchStarted {
            total,
            source: run.source().dimensions(),
        },
    );

    let mut report = BatchReport::default();
    while let Some(outcome) = run.step(backend, target, settings) {
        let index = run.completed();
        match outcome {
            Ok(record) => {
                emit(
                    &events,
                    ExportEvent::Saved {
                        index,
                        total,
                        record: record.clone(),
                    },
                );
                report.saved.push(record);
            }
            Err(failure) => {
                emit(
                    &events,
                    ExportEvent::Failed {
                        index,
                        total,
                        failure: failure.clone(),
                    },
                );
                report.failed.push(failure);
            }
        }
    }

    session.finish_batch();
    log::info!(
        "batch export finished: {} saved, {} failed",
        report.saved.len(),
        report.failed.len()
    );
    emit(
        &events,
        ExportEvent::BatchFinished {
            saved: report.saved.len(),
            failed: report.failed.len(),
        },
    );
    Ok(report)
}

fn emit(events: &Option<Sender<ExportEvent>>, event: ExportEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; keep exporting.
        tx.send(event).ok();
    }
}
