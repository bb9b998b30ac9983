//! Resizer configuration module.
//!
//! Handles loading, validating, and merging `logo-resizer.toml`. Stock
//! defaults are the base layer; a user config file overrides any subset of
//! them. Everything is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! [export]
//! output_dir = "."          # Where files are saved
//! prefix = "logo"           # Filename prefix: <prefix>-<size>.<ext>
//! jpeg_quality = 95         # JPEG quality (1-100)
//! delay_ms = 300            # Pause between batch exports
//!
//! [[sizes]]                 # Replaces the whole stock catalog when present
//! name = "500x378"
//! width = 500
//! height = 378
//! formats = ["png"]         # png (transparent) and/or jpg (white background)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::{SizeSpec, default_catalog};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "logo-resizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resizer configuration loaded from `logo-resizer.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Output location, naming, and pacing.
    pub export: ExportConfig,
    /// The size catalog, in export order.
    pub sizes: Vec<SizeSpec>,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            sizes: default_catalog(),
        }
    }
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(ConfigError::Validation(
                "export.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.export.prefix.is_empty() || self.export.prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.prefix must be non-empty and contain no path separators".into(),
            ));
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }

        let mut names = HashSet::new();
        for spec in &self.sizes {
            if spec.name.is_empty() || spec.name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "size name '{}' must be non-empty and contain no path separators",
                    spec.name
                )));
            }
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "size name '{}' is used more than once",
                    spec.name
                )));
            }
            if spec.width == 0 || spec.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "size '{}' must have non-zero width and height",
                    spec.name
                )));
            }
            if spec.formats.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "size '{}' must list at least one format",
                    spec.name
                )));
            }
            let unique: HashSet<_> = spec.formats.iter().collect();
            if unique.len() != spec.formats.len() {
                return Err(ConfigError::Validation(format!(
                    "size '{}' lists a format more than once",
                    spec.name
                )));
            }
        }
        Ok(())
    }
}

/// Output location, naming, and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory files are written to.
    pub output_dir: String,
    /// Filename prefix.
    pub prefix: String,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
    /// Milliseconds to wait between consecutive batch exports.
    pub delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            prefix: "logo".to_string(),
            jpeg_quality: 95,
            delay_ms: 300,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including the `sizes` array) replace base
///   values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a specific file.
///
/// A missing file yields the stock defaults.
pub fn load_config_file(path: &Path) -> Result<ResizerConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load config from `logo-resizer.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<ResizerConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILENAME))
}

/// Returns a fully-commented stock `logo-resizer.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Logo Resizer Configuration
# ==========================
#
# Every key is optional. Values shown are the defaults.
# Unknown keys are rejected.

[export]
# Directory exported files are written to.
output_dir = "."

# Filename prefix: files are named <prefix>-<size name>.<ext>
prefix = "logo"

# JPEG quality, 1 (smallest) to 100 (best).
jpeg_quality = 95

# Pause between consecutive exports in a batch, in milliseconds.
delay_ms = 300

# ---------------------------------------------------------------------------
# Size catalog
# ---------------------------------------------------------------------------
# Each [[sizes]] entry is one target box. The logo is scaled to fit inside
# it without cropping and centered; leftover space is transparent for png
# and white for jpg. Declaring any [[sizes]] replaces the whole list below.
#
# Batch export runs top to bottom, and formats left to right.

[[sizes]]
name = "500x378"
width = 500
height = 378
formats = ["png"]

[[sizes]]
name = "265x46"
width = 265
height = 46
formats = ["png"]

[[sizes]]
name = "398x161"
width = 398
height = 161
formats = ["png"]

[[sizes]]
name = "100x50"
width = 100
height = 50
formats = ["png"]

[[sizes]]
name = "200x90"
width = 200
height = 90
formats = ["png", "jpg"]

[[sizes]]
name = "1920x1110"
width = 1920
height = 1110
formats = ["jpg"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ResizerConfig::default();
        assert_eq!(config.export.output_dir, ".");
        assert_eq!(config.export.prefix, "logo");
        assert_eq!(config.export.jpeg_quality, 95);
        assert_eq!(config.export.delay_ms, 300);
        assert_eq!(config.sizes, default_catalog());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[export]
prefix = "brand"
"#;
        let config: ResizerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.export.prefix, "brand");
        // Defaults preserved
        assert_eq!(config.export.jpeg_quality, 95);
        assert_eq!(config.sizes.len(), 6);
    }

    #[test]
    fn parse_custom_sizes() {
        let toml = r#"
[[sizes]]
name = "favicon"
width = 32
height = 32
formats = ["png", "jpeg"]
"#;
        let config: ResizerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.sizes.len(), 1);
        assert_eq!(config.sizes[0].name, "favicon");
        assert_eq!(
            config.sizes[0].formats,
            vec![OutputFormat::Png, OutputFormat::Jpeg]
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ResizerConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[export]
output_dir = "out"
delay_ms = 0
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.output_dir, "out");
        assert_eq!(config.export.delay_ms, 0);
        assert_eq!(config.export.prefix, "logo");
        assert_eq!(config.sizes, default_catalog());
    }

    #[test]
    fn load_config_file_with_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[export]\njpeg_quality = 80\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.export.jpeg_quality, 80);
    }

    #[test]
    fn overlay_sizes_replace_catalog() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[[sizes]]
name = "square"
width = 512
height = 512
formats = ["png"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.sizes.len(), 1);
        assert_eq!(config.sizes[0].name, "square");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[export]\nqualty = 90\n").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_format_rejected() {
        let toml = r#"
[[sizes]]
name = "x"
width = 1
height = 1
formats = ["gif"]
"#;
        assert!(toml::from_str::<ResizerConfig>(toml).is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[export]\nprefix = \"logo\"\ndelay_ms = 300").unwrap();
        let overlay: toml::Value = toml::from_str("[export]\ndelay_ms = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["export"]["prefix"].as_str(), Some("logo"));
        assert_eq!(merged["export"]["delay_ms"].as_integer(), Some(10));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("items = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("items = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["items"].as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    fn with_sizes(sizes: Vec<SizeSpec>) -> ResizerConfig {
        ResizerConfig {
            sizes,
            ..ResizerConfig::default()
        }
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(ResizerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = ResizerConfig::default();
        config.export.jpeg_quality = 100;
        assert!(config.validate().is_ok());
        config.export.jpeg_quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.export.jpeg_quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_prefix() {
        let mut config = ResizerConfig::default();
        config.export.prefix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_prefix_with_path_separator() {
        for prefix in ["../x", "out/logo", "a\\b"] {
            let mut config = ResizerConfig::default();
            config.export.prefix = prefix.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(m)) if m.contains("prefix")),
                "{prefix}"
            );
        }
    }

    #[test]
    fn validate_empty_catalog() {
        assert!(with_sizes(vec![]).validate().is_err());
    }

    #[test]
    fn validate_zero_dimension() {
        let config = with_sizes(vec![SizeSpec::new("x", 0, 10, &[OutputFormat::Png])]);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(m)) if m.contains("'x'")));
    }

    #[test]
    fn validate_empty_formats() {
        let config = with_sizes(vec![SizeSpec::new("x", 10, 10, &[])]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_duplicate_format() {
        let config = with_sizes(vec![SizeSpec::new(
            "x",
            10,
            10,
            &[OutputFormat::Png, OutputFormat::Png],
        )]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_duplicate_name() {
        let config = with_sizes(vec![
            SizeSpec::new("x", 10, 10, &[OutputFormat::Png]),
            SizeSpec::new("x", 20, 20, &[OutputFormat::Jpeg]),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_name_with_separator() {
        let config = with_sizes(vec![SizeSpec::new("../x", 10, 10, &[OutputFormat::Png])]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[export]\njpeg_quality = 500\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ResizerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ResizerConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        assert!(table.contains_key("export"));
        assert_eq!(table["sizes"].as_array().unwrap().len(), 6);
    }
}
