//! # Logo Resizer
//!
//! Takes one logo image and exports it at a fixed catalog of target sizes.
//! The logo keeps its aspect ratio and is centered on a canvas of exactly the
//! target size: transparent for PNG, white for JPEG.
//!
//! # Architecture: Load, Render, Save
//!
//! ```text
//! 1. Load     file      →  Session           (decode once, keep the pixels)
//! 2. Render   snapshot  →  bytes             (letterbox, canvas, encode)
//! 3. Save     bytes     →  <output_dir>/     (one file per size and format)
//! ```
//!
//! Rendering never touches the filesystem and saving never touches pixels,
//! so each stage is tested on its own with a mock backend or an in-memory
//! save target.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | The size catalog: names, target dimensions, formats, filenames |
//! | [`session`] | The current image and the batch-in-progress guard |
//! | [`export`] | Single and batch export, save targets, progress events |
//! | [`imaging`] | Letterbox math and the pure-Rust decode/render/encode backend |
//! | [`config`] | `logo-resizer.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Snapshot Batches
//!
//! The session stores its image behind an `Arc`. A batch clones that `Arc`
//! when it starts, so loading a different logo while a batch runs only
//! affects later exports.
//!
//! ## Vector Sources
//!
//! SVG logos are kept as documents next to their preview raster. Each export
//! re-rasterizes the document at the placement size instead of resampling a
//! fixed-size bitmap, so large targets stay sharp.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling, and PNG/JPEG encoding use the `image` crate;
//! SVG goes through `resvg`. No system libraries are needed.

pub mod catalog;
pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
