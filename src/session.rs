//! Session state: the current logo and the batch guard.
//!
//! A [`Session`] owns at most one decoded image. Loading a new file replaces
//! it; a failed load leaves the previous image in place. The `processing`
//! flag is set while a batch is running so a second batch cannot start. It is
//! a guard, not a lock or a queue.
//!
//! Images are held behind an [`Arc`]. A batch takes its own clone of that
//! `Arc` when it starts, so replacing the session's image mid-batch does not
//! change what the running batch renders.

use crate::catalog::SizeSpec;
use crate::export::{BatchRun, ExportError};
use crate::imaging::{BackendError, Dimensions, ImageBackend, SourceImage, load_source};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load {}: {source}", path.display())]
    File { path: PathBuf, source: BackendError },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] BackendError),
}

/// What a load request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file was selected; the session is unchanged.
    NoFile,
    /// A new image replaced the current one.
    Loaded(Dimensions),
}

#[derive(Debug, Default)]
pub struct Session {
    image: Option<Arc<SourceImage>>,
    processing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the selected file, if any.
    ///
    /// `None` is a no-op. On error the current image is kept.
    pub fn load_file(
        &mut self,
        backend: &impl ImageBackend,
        file: Option<&Path>,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(path) = file else {
            log::debug!("no file selected, keeping current image");
            return Ok(LoadOutcome::NoFile);
        };

        match load_source(backend, path) {
            Ok(source) => {
                let dims = source.dimensions();
                log::info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    dims.width,
                    dims.height
                );
                self.image = Some(Arc::new(source));
                Ok(LoadOutcome::Loaded(dims))
            }
            Err(source) => {
                log::warn!("keeping previous image: {} failed to load", path.display());
                Err(LoadError::File {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Load an image from bytes already in memory.
    pub fn load_bytes(
        &mut self,
        backend: &impl ImageBackend,
        bytes: &[u8],
        hint: Option<&str>,
    ) -> Result<Dimensions, LoadError> {
        let source = backend.decode(bytes, hint)?;
        let dims = source.dimensions();
        self.image = Some(Arc::new(source));
        Ok(dims)
    }

    /// The current image, if one is loaded.
    pub fn image(&self) -> Option<&Arc<SourceImage>> {
        self.image.as_ref()
    }

    /// True while a batch export is running.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Snapshot the current image and begin a batch over `catalog`.
    ///
    /// Fails if nothing is loaded or another batch is still running. Pair
    /// with [`finish_batch`](Self::finish_batch).
    pub fn start_batch(&mut self, catalog: &[SizeSpec]) -> Result<BatchRun, ExportError> {
        if self.processing {
            return Err(ExportError::BatchInProgress);
        }
        let image = self.image.clone().ok_or(ExportError::NoImage)?;
        self.processing = true;
        Ok(BatchRun::new(image, catalog))
    }

    /// Clear the processing flag.
    pub fn finish_batch(&mut self) {
        self.processing = false;
    }
}
