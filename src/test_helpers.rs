//! Shared test utilities for the logo-resizer test suite.
//!
//! Provides synthetic images and an in-memory [`SaveTarget`] so export tests
//! can check filenames, order, and bytes without touching the filesystem.

use crate::export::{ExportSettings, SaveTarget};
use crate::imaging::SourceImage;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a solid-colour RGBA image as PNG bytes.
pub fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, color);
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

/// A decoded solid-colour source.
pub fn solid_source(width: u32, height: u32, color: Rgba<u8>) -> SourceImage {
    SourceImage::from_rgba(RgbaImage::from_pixel(width, height, color)).unwrap()
}

/// Default settings without the batch pause.
pub fn instant_settings() -> ExportSettings {
    ExportSettings {
        delay: Duration::ZERO,
        ..ExportSettings::default()
    }
}

// =========================================================================
// In-memory save target
// =========================================================================

/// Records saved files in order instead of writing them.
#[derive(Default)]
pub struct MemoryTarget {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved filenames in save order.
    pub fn filenames(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Bytes of the most recent save under `name`.
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.clone())
    }
}

impl SaveTarget for MemoryTarget {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
