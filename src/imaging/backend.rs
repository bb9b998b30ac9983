//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, render, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which is pure Rust with no system
//! libraries. Everything is statically linked into the binary.

use super::params::{OutputFormat, Quality, RenderParams};
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("SVG rasterization failed: {0}")]
    Svg(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Image has zero width or height")]
    EmptyImage,
}

/// Pixel size of a decoded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded logo, held for the lifetime of one load.
///
/// Raster sources keep their RGBA pixels. Vector sources keep only the
/// document bytes and its intrinsic size; every render rasterizes at the
/// target scale, so nothing is drawn at the declared size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    content: SourceContent,
}

#[derive(Debug, Clone)]
enum SourceContent {
    Raster(RgbaImage),
    Vector(Arc<[u8]>),
}

impl SourceImage {
    /// Wrap decoded RGBA pixels. Fails on zero-sized images.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, BackendError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(BackendError::EmptyImage);
        }
        Ok(Self {
            width,
            height,
            content: SourceContent::Raster(pixels),
        })
    }

    /// Wrap an SVG document with its intrinsic size.
    pub fn from_svg(width: u32, height: u32, document: Arc<[u8]>) -> Result<Self, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::EmptyImage);
        }
        Ok(Self {
            width,
            height,
            content: SourceContent::Vector(document),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Decoded pixels of a raster source.
    pub fn pixels(&self) -> Option<&RgbaImage> {
        match &self.content {
            SourceContent::Raster(pixels) => Some(pixels),
            SourceContent::Vector(_) => None,
        }
    }

    /// SVG document bytes, if this source came from a vector file.
    pub fn vector_data(&self) -> Option<&[u8]> {
        match &self.content {
            SourceContent::Raster(_) => None,
            SourceContent::Vector(document) => Some(document),
        }
    }
}

/// A freshly rendered canvas, consumed by [`ImageBackend::encode`].
#[derive(Debug)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub pixels: RgbaImage,
}

impl RenderedOutput {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the rest of the
/// codebase is backend-agnostic.
pub trait ImageBackend: Sync {
    /// Decode raw file bytes. `hint` is the file extension, if known.
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> Result<SourceImage, BackendError>;

    /// Letterbox `source` onto a canvas of exactly `params.width × params.height`.
    fn render(
        &self,
        source: &SourceImage,
        params: &RenderParams,
    ) -> Result<RenderedOutput, BackendError>;

    /// Encode a rendered canvas into its output format.
    fn encode(&self, output: RenderedOutput, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
