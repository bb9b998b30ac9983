//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a source and a target, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::calculations::calculate_letterbox;
use super::params::{OutputFormat, Quality, RenderParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Read a file from disk and decode it.
///
/// The file extension is passed to the backend as a format hint.
pub fn load_source(backend: &impl ImageBackend, path: &Path) -> Result<SourceImage> {
    let bytes = std::fs::read(path)?;
    let hint = path.extension().and_then(|e| e.to_str());
    let source = backend.decode(&bytes, hint)?;
    log::debug!(
        "decoded {} ({} bytes) → {}x{}",
        path.display(),
        bytes.len(),
        source.width(),
        source.height()
    );
    Ok(source)
}

/// Plan a letterboxed render without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_render(source: (u32, u32), target: (u32, u32), format: OutputFormat) -> RenderParams {
    RenderParams {
        width: target.0,
        height: target.1,
        placement: calculate_letterbox(source, target),
        format,
    }
}

/// Render one variant and encode it, returning the file bytes.
///
/// The rendered canvas only lives between the two backend calls. A target
/// with a zero side is rejected before the backend is called.
pub fn render_variant(
    backend: &impl ImageBackend,
    source: &SourceImage,
    target: (u32, u32),
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>> {
    if target.0 == 0 || target.1 == 0 {
        return Err(BackendError::EmptyImage);
    }
    let params = plan_render((source.width(), source.height()), target, format);
    let rendered = backend.render(source, &params)?;
    backend.encode(rendered, quality)
}
