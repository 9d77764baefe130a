//! Project configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the project root next to the data and assets:
//!
//! ```text
//! project/
//! ├── config.toml          # optional, overrides stock defaults
//! ├── data/
//! │   └── posts.xlsx       # the spreadsheet
//! └── static/              # local asset root (avatars/, images/, ...)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Clipping"
//! date_format = "%d/%m/%Y %H:%M"
//!
//! [data]
//! path = "data/posts.xlsx"
//!
//! [assets]
//! static_dir = "static"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [report]
//! title = "Relatório"
//! posts_per_page = 2
//!
//! [export]
//! output_dir = "dist"
//!
//! [pdf]
//! output_dir = "exports"
//! clipping_file = "clipping.pdf"
//! report_file = "clipping-relatorio.pdf"
//! wait_ms = 800
//!
//! [pdf.margins]          # millimetres
//! top = 18.0
//! bottom = 16.0
//! left = 14.0
//! right = 14.0
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults; user files only specify overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding and display settings.
    pub site: SiteSection,
    /// Where the spreadsheet lives.
    pub data: DataConfig,
    /// Local asset root.
    pub assets: AssetsConfig,
    /// Live view listen address.
    pub server: ServerConfig,
    /// Printable report layout.
    pub report: ReportConfig,
    /// Static snapshot output.
    pub export: ExportConfig,
    /// PDF printing.
    pub pdf: PdfConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "report.posts_per_page must be at least 1".into(),
            ));
        }
        if self.site.date_format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.date_format must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.site.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation(format!(
                "site.date_format is not a valid strftime string: {:?}",
                self.site.date_format
            )));
        }
        if self.pdf.clipping_file == self.pdf.report_file {
            return Err(ConfigError::Validation(
                "pdf.clipping_file and pdf.report_file must differ".into(),
            ));
        }
        let m = &self.pdf.margins;
        if [m.top, m.bottom, m.left, m.right]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Validation(
                "pdf.margins must be non-negative millimetres".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Brand shown in page headers and titles.
    pub title: String,
    /// chrono format string for post timestamps.
    pub date_format: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Clipping".to_string(),
            date_format: "%d/%m/%Y %H:%M".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Spreadsheet path, relative to the project root.
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/posts.xlsx"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory served as `/static/`, relative to the project root.
    pub static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    /// Posts printed on each report page.
    pub posts_per_page: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Relatório".to_string(),
            posts_per_page: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Snapshot directory, relative to the project root. Cleared on export.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    pub output_dir: PathBuf,
    pub clipping_file: String,
    pub report_file: String,
    /// Extra settle time after navigation, for web fonts and remote images.
    pub wait_ms: u64,
    pub margins: Margins,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            clipping_file: "clipping.pdf".to_string(),
            report_file: "clipping-relatorio.pdf".to_string(),
            wait_ms: 800,
            margins: Margins::default(),
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 18.0,
            bottom: 16.0,
            left: 14.0,
            right: 14.0,
        }
    }
}

/// A loaded configuration anchored at its project root.
///
/// Paths in the config are relative to `root`; these helpers resolve them.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: SiteConfig,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            root: root.to_path_buf(),
            config: load_config(root)?,
        })
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.config.data.path)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.root.join(&self.config.assets.static_dir)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join(&self.config.export.output_dir)
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.root.join(&self.config.pdf.output_dir)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `root`, falling back to defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# insta-clip configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Brand shown in page headers and browser titles.
title = "Clipping"

# How post timestamps are printed (chrono strftime syntax).
date_format = "%d/%m/%Y %H:%M"

# ---------------------------------------------------------------------------
# Data
# ---------------------------------------------------------------------------
[data]
# Spreadsheet with one post per row; only the first sheet is read.
path = "data/posts.xlsx"

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Local asset root. Image cells starting with /static/ point in here.
# Missing placeholder images (avatars/default.svg, images/placeholder.svg)
# are created on first use.
static_dir = "static"

# ---------------------------------------------------------------------------
# Live server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
# Also settable with --port or the PORT environment variable.
port = 5000

# ---------------------------------------------------------------------------
# Printable report
# ---------------------------------------------------------------------------
[report]
title = "Relatório"
# Posts printed per A4 page.
posts_per_page = 2

# ---------------------------------------------------------------------------
# Static snapshot
# ---------------------------------------------------------------------------
[export]
# Cleared and rewritten on every export.
output_dir = "dist"

# ---------------------------------------------------------------------------
# PDF
# ---------------------------------------------------------------------------
[pdf]
output_dir = "exports"
# Feed followed by profiles.
clipping_file = "clipping.pdf"
# Paginated report.
report_file = "clipping-relatorio.pdf"
# Extra wait after page load, for web fonts and remote images.
wait_ms = 800

# Page margins in millimetres.
[pdf.margins]
top = 18.0
bottom = 16.0
left = 14.0
right = 14.0
"##
}
