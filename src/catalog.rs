//! The size catalog: which variants a logo is exported to.
//!
//! Each [`SizeSpec`] names a fixed target box and the formats to produce for
//! it. Export order is catalog order, then format order within each spec,
//! so the list below is also the order files appear on disk.
//!
//! ## Stock catalog
//!
//! | Name | Box | Formats |
//! |---|---|---|
//! | `500x378` | 500 × 378 | png |
//! | `265x46` | 265 × 46 | png |
//! | `398x161` | 398 × 161 | png |
//! | `100x50` | 100 × 50 | png |
//! | `200x90` | 200 × 90 | png, jpg |
//! | `1920x1110` | 1920 × 1110 | jpg |
//!
//! ## Filenames
//!
//! Every output is named `<prefix>-<name>.<ext>`, e.g. `logo-500x378.png`.

use crate::imaging::OutputFormat;
use serde::{Deserialize, Serialize};

/// A configured export target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    /// Label used in filenames and listings.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Formats to produce, in export order.
    pub formats: Vec<OutputFormat>,
}

impl SizeSpec {
    pub fn new(name: &str, width: u32, height: u32, formats: &[OutputFormat]) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            formats: formats.to_vec(),
        }
    }

    /// Target box as `(width, height)`.
    pub fn target(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn supports(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Output filename for one format of this spec.
    pub fn filename(&self, prefix: &str, format: OutputFormat) -> String {
        format!("{}-{}.{}", prefix, self.name, format.extension())
    }
}

/// The stock catalog, in export order.
pub fn default_catalog() -> Vec<SizeSpec> {
    use OutputFormat::{Jpeg, Png};
    vec![
        SizeSpec::new("500x378", 500, 378, &[Png]),
        SizeSpec::new("265x46", 265, 46, &[Png]),
        SizeSpec::new("398x161", 398, 161, &[Png]),
        SizeSpec::new("100x50", 100, 50, &[Png]),
        SizeSpec::new("200x90", 200, 90, &[Png, Jpeg]),
        SizeSpec::new("1920x1110", 1920, 1110, &[Jpeg]),
    ]
}

/// Find a spec by name.
pub fn find<'a>(catalog: &'a [SizeSpec], name: &str) -> Option<&'a SizeSpec> {
    catalog.iter().find(|spec| spec.name == name)
}

/// Number of files a full batch produces.
pub fn total_exports(catalog: &[SizeSpec]) -> usize {
    catalog.iter().map(|spec| spec.formats.len()).sum()
}

/// Every `(spec, format)` pair in export order.
pub fn export_jobs(catalog: &[SizeSpec]) -> impl Iterator<Item = (&SizeSpec, OutputFormat)> {
    catalog
        .iter()
        .flat_map(|spec| spec.formats.iter().map(move |&format| (spec, format)))
}
