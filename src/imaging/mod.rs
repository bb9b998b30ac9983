//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory`, `resvg` for SVG |
//! | **Letterbox** | premultiplied Lanczos3 resize + `replace` onto a canvas, flattened onto white for JPEG |
//! | **Encode** | `PngEncoder` (RGBA) / `JpegEncoder` (RGB, quality 95) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RenderedOutput, SourceImage};
pub use calculations::{Placement, calculate_letterbox};
pub use operations::{load_source, plan_render, render_variant};
pub use params::{OutputFormat, ParseFormatError, Quality, RenderParams};
pub use rust_backend::RustBackend;
