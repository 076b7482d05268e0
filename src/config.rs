//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `s3-gallery.toml`. A config file is
//! sparse: whatever keys it sets are merged on top of the stock defaults, and
//! everything else keeps its default value.
//!
//! ## Config File Location
//!
//! 1. The path given with `--config`, if any (it must exist).
//! 2. Otherwise `s3-gallery.toml` in the working directory, if present.
//! 3. Otherwise stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! title = "S3 Gallery"          # App bar and <title>
//! min_column_width = "250px"    # Grid columns: repeat(auto-fit, minmax(this, 1fr))
//! gap = "16px"                  # Gap between tiles
//! fade_in_ms = 300              # Tile fade-in once the image has loaded
//! preview_max_height = "80vh"   # Full-size preview dialog height cap
//!
//! [colors.light]
//! background = "#f5f5f5"
//! surface = "#ffffff"           # Tile and dialog background
//! text = "#1f1f1f"
//! app_bar = "#1976d2"
//! app_bar_text = "#ffffff"
//! error = "#d32f2f"             # "No images found" banner
//!
//! [colors.dark]
//! background = "#121212"
//! surface = "#1e1e1e"
//! text = "#eeeeee"
//! app_bar = "#272727"
//! app_bar_text = "#ffffff"
//! error = "#f44336"
//!
//! [fetch]
//! user_agent = "s3-gallery/<version>"
//! timeout_secs = 30
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "s3-gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `s3-gallery.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Gallery page layout.
    pub gallery: GalleryConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// HTTP settings for fetching listings by URL.
    pub fetch: FetchConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let css_values = [
            ("gallery.min_column_width", &self.gallery.min_column_width),
            ("gallery.gap", &self.gallery.gap),
            ("gallery.preview_max_height", &self.gallery.preview_max_height),
        ];
        for (name, value) in css_values {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        if self.gallery.fade_in_ms > 10_000 {
            return Err(ConfigError::Validation(
                "gallery.fade_in_ms must be at most 10000".into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be non-zero".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fetch.user_agent must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Gallery page layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Title shown in the app bar and the document `<title>`.
    pub title: String,
    /// Minimum tile width (CSS value) for the auto-fit grid.
    pub min_column_width: String,
    /// Gap between tiles (CSS value).
    pub gap: String,
    /// Opacity transition once an image has loaded, in milliseconds.
    pub fade_in_ms: u32,
    /// Max height of the image in the preview dialog (CSS value).
    pub preview_max_height: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "S3 Gallery".to_string(),
            min_column_width: "250px".to_string(),
            gap: "16px".to_string(),
            fade_in_ms: 300,
            preview_max_height: "80vh".to_string(),
        }
    }
}

/// HTTP settings used when the listing source is a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Whole-request timeout. There are no retries.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("s3-gallery/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Tile, placeholder, and dialog background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// App bar background.
    pub app_bar: String,
    /// App bar text.
    pub app_bar_text: String,
    /// Status banner color.
    pub error: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f5f5".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f1f1f".to_string(),
            app_bar: "#1976d2".to_string(),
            app_bar_text: "#ffffff".to_string(),
            error: "#d32f2f".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            surface: "#1e1e1e".to_string(),
            text: "#eeeeee".to_string(),
            app_bar: "#272727".to_string(),
            app_bar_text: "#ffffff".to_string(),
            error: "#f44336".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
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

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config.
///
/// An explicit `path` must exist. Without one, `s3-gallery.toml` in `cwd` is
/// used when present.
pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    let overlay = match path {
        Some(p) => Some(load_raw_config(p)?),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if candidate.exists() {
                Some(load_raw_config(&candidate)?)
            } else {
                None
            }
        }
    };
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `s3-gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> String {
    format!(
        r##"# S3 Gallery Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass a file with --config, or drop it next to where you run the command
# as {DEFAULT_CONFIG_FILE}. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Gallery layout
# ---------------------------------------------------------------------------
[gallery]
# Shown in the app bar and the browser tab.
title = "S3 Gallery"

# Tiles are laid out with repeat(auto-fit, minmax(min_column_width, 1fr)).
min_column_width = "250px"

# Gap between tiles (CSS value).
gap = "16px"

# Fade-in duration once each lazily-loaded image arrives, in milliseconds.
fade_in_ms = 300

# Height cap of the full-size preview dialog (CSS value).
preview_max_height = "80vh"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f5f5"
surface = "#ffffff"       # Tiles, placeholders, preview dialog
text = "#1f1f1f"
app_bar = "#1976d2"
app_bar_text = "#ffffff"
error = "#d32f2f"         # Status banner

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
surface = "#1e1e1e"
text = "#eeeeee"
app_bar = "#272727"
app_bar_text = "#ffffff"
error = "#f44336"

# ---------------------------------------------------------------------------
# Fetching listings by URL
# ---------------------------------------------------------------------------
[fetch]
user_agent = "s3-gallery/{version}"

# Whole-request timeout in seconds. Failed requests are not retried.
timeout_secs = 30
"##,
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = scheme_properties(&colors.light, "    "),
        dark = scheme_properties(&colors.dark, "        "),
    )
}

fn scheme_properties(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-app-bar", &scheme.app_bar),
        ("--color-app-bar-text", &scheme.app_bar_text),
        ("--color-error", &scheme.error),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from gallery layout config.
pub fn generate_layout_css(gallery: &GalleryConfig) -> String {
    format!(
        r#":root {{
    --grid-min-column: {min_column_width};
    --grid-gap: {gap};
    --fade-in: {fade_in_ms}ms;
    --preview-max-height: {preview_max_height};
}}"#,
        min_column_width = gallery.min_column_width,
        gap = gallery.gap,
        fade_in_ms = gallery.fade_in_ms,
        preview_max_height = gallery.preview_max_height,
    )
}
