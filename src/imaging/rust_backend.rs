//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, GIF, BMP, ICO, TIFF, WebP) | `image::load_from_memory` |
//! | Decode (SVG, SVGZ) | `usvg` parse only; drawn per render with `resvg` |
//! | Resize | `image::imageops::resize` with `Lanczos3`, in premultiplied `f32` |
//! | Letterbox | `image::imageops::replace` onto a transparent canvas |
//! | Flatten (JPEG) | alpha-composite the canvas onto white |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA8) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB8, quality) |

use super::backend::{BackendError, ImageBackend, RenderedOutput, SourceImage};
use super::calculations::Placement;
use super::params::{OutputFormat, Quality, RenderParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, Rgba32FImage, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::sync::Arc;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How far into the file to look for an `<svg` root when sniffing.
const SNIFF_LEN: usize = 1024;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide whether `bytes` hold an SVG document.
///
/// The extension wins when present (`svg` or `svgz`); otherwise the root
/// element is sniffed.
fn is_svg(bytes: &[u8], hint: Option<&str>) -> bool {
    match hint {
        Some(ext) => ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"),
        None => sniff_svg_root(bytes),
    }
}

/// True when the first element after any XML declaration, comments, and
/// doctype is `<svg`.
fn sniff_svg_root(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    let mut rest = head.trim_start_matches('\u{feff}').trim_start();
    loop {
        if rest.starts_with("<svg") {
            return true;
        }
        let skip = if rest.starts_with("<?") {
            rest.find("?>").map(|i| i + 2)
        } else if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else if rest.starts_with("<!") {
            rest.find('>').map(|i| i + 1)
        } else {
            None
        };
        match skip {
            Some(i) => rest = rest[i..].trim_start(),
            None => return false,
        }
    }
}

/// Parse SVG or gzip-compressed SVGZ bytes.
fn parse_svg(bytes: &[u8]) -> Result<usvg::Tree, BackendError> {
    usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| BackendError::Svg(e.to_string()))
}

/// Rasterize an SVG tree into an RGBA image of exactly `width × height`.
///
/// tiny-skia stores premultiplied alpha; the `image` crate expects straight
/// alpha, so every pixel is demultiplied on the way out.
fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> Result<RgbaImage, BackendError> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BackendError::Svg(format!("cannot allocate {width}x{height} pixmap")))?;

    let size = tree.size();
    let transform =
        tiny_skia::Transform::from_scale(width as f32 / size.width(), height as f32 / size.height());
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| BackendError::Svg("rasterized buffer has the wrong size".into()))
}

/// Parse an SVG for its intrinsic size. Nothing is drawn here.
fn decode_svg(bytes: &[u8]) -> Result<SourceImage, BackendError> {
    let size = parse_svg(bytes)?.size().to_int_size();
    SourceImage::from_svg(size.width(), size.height(), Arc::from(bytes))
}

/// Lanczos3 resize in premultiplied `f32`.
///
/// Resampling straight alpha lets the colour of fully transparent pixels
/// bleed into visible edges.
fn resize_premultiplied(pixels: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut linear: Rgba32FImage = DynamicImage::ImageRgba8(pixels.clone()).into_rgba32f();
    for p in linear.pixels_mut() {
        let a = p[3];
        p[0] *= a;
        p[1] *= a;
        p[2] *= a;
    }

    let resized = imageops::resize(&linear, width, height, FilterType::Lanczos3);

    RgbaImage::from_fn(width, height, |x, y| {
        let p = resized.get_pixel(x, y);
        let a = p[3].clamp(0.0, 1.0);
        if a <= 0.0 {
            return TRANSPARENT;
        }
        let channel = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([
            channel(p[0]),
            channel(p[1]),
            channel(p[2]),
            (a * 255.0).round() as u8,
        ])
    })
}

/// Produce the scaled source for a placement.
///
/// Vector sources are rasterized at the placement size; raster sources are
/// resampled.
fn scale_source(source: &SourceImage, placement: &Placement) -> Result<RgbaImage, BackendError> {
    if let Some(document) = source.vector_data() {
        let tree = parse_svg(document)?;
        return rasterize_svg(&tree, placement.width, placement.height);
    }
    let pixels = source.pixels().ok_or(BackendError::EmptyImage)?;
    if pixels.dimensions() == (placement.width, placement.height) {
        return Ok(pixels.clone());
    }
    Ok(resize_premultiplied(
        pixels,
        placement.width,
        placement.height,
    ))
}

/// Composite every pixel onto opaque white.
fn flatten_onto_white(canvas: &mut RgbaImage) {
    for p in canvas.pixels_mut() {
        let a = p[3] as u32;
        for c in 0..3 {
            p[c] = ((p[c] as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        }
        p[3] = 255;
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> Result<SourceImage, BackendError> {
        if is_svg(bytes, hint) {
            return decode_svg(bytes);
        }
        let img = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
        SourceImage::from_rgba(img.to_rgba8())
    }

    fn render(
        &self,
        source: &SourceImage,
        params: &RenderParams,
    ) -> Result<RenderedOutput, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::EmptyImage);
        }
        let placement = &params.placement;
        let scaled = scale_source(source, placement)?;

        let mut canvas = RgbaImage::from_pixel(params.width, params.height, TRANSPARENT);
        imageops::replace(&mut canvas, &scaled, placement.x as i64, placement.y as i64);
        if !params.format.supports_transparency() {
            flatten_onto_white(&mut canvas);
        }

        Ok(RenderedOutput {
            format: params.format,
            pixels: canvas,
        })
    }

    fn encode(&self, output: RenderedOutput, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let (width, height) = output.pixels.dimensions();
        let mut buf = Vec::new();

        let result = match output.format {
            OutputFormat::Png => PngEncoder::new(&mut buf).write_image(
                output.pixels.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            OutputFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(output.pixels).to_rgb8();
                JpegEncoder::new_with_quality(&mut buf, quality.as_u8()).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
        };

        result.map_err(|e| BackendError::Encode(format!("{}: {}", output.format, e)))?;
        Ok(buf)
    }
}
