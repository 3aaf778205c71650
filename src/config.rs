//! Site configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` that sits in the
//! site root next to the layout directories. Stock defaults are overridden by
//! whatever the user file specifies; everything else keeps its default.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Site config (optional)
//! ├── frequencies.json         # Character frequency tables per language
//! ├── queue.txt                # Update manifest
//! ├── qwerty/
//! │   ├── layout.txt
//! │   ├── info.txt
//! │   └── stats.txt
//! └── colemak_dh/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! frequencies = "frequencies.json"  # Frequency store, relative to the site root
//! manifest = "queue.txt"            # Update manifest, relative to the site root
//!
//! [files]
//! layout = "layout.txt"     # Whitespace-delimited key characters
//! text = "info.txt"         # Free-text description
//! stats = "stats.txt"       # Analyzer statistics block
//!
//! [keyboard]
//! row_breaks = [4, 14, 24]  # Spacer after these 0-based key positions
//!
//! [heat]
//! baseline = 70.0           # Shared intercept of the three color channels
//! red = 25.0                # Red gained per unit of heat score
//! green = 6.0               # Green lost per unit of heat score
//! blue = 8.0                # Blue lost per unit of heat score
//!
//! [page]
//! site_title = "Keyboard Layouts"
//! stylesheet = "/style.css"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the character frequency store, relative to the site root.
    pub frequencies: String,
    /// Path of the update manifest, relative to the site root.
    pub manifest: String,
    /// Names of the three files every layout directory carries.
    pub files: FilesConfig,
    /// Keyboard diagram shape.
    pub keyboard: KeyboardConfig,
    /// Heat color palette.
    pub heat: HeatConfig,
    /// Page chrome (title, stylesheet, navigation links).
    pub page: PageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            frequencies: "frequencies.json".to_string(),
            manifest: "queue.txt".to_string(),
            files: FilesConfig::default(),
            keyboard: KeyboardConfig::default(),
            heat: HeatConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequencies.trim().is_empty() || self.manifest.trim().is_empty() {
            return Err(ConfigError::Validation(
                "frequencies and manifest paths must not be empty".into(),
            ));
        }
        let files = &self.files;
        if [&files.layout, &files.text, &files.stats]
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "files.layout, files.text and files.stats must not be empty".into(),
            ));
        }
        if self.keyboard.row_breaks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Validation(
                "keyboard.row_breaks must be strictly increasing".into(),
            ));
        }
        let heat = &self.heat;
        if ![heat.baseline, heat.red, heat.green, heat.blue]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ConfigError::Validation(
                "heat values must be finite numbers".into(),
            ));
        }
        Ok(())
    }

    /// Absolute location of the frequency store for a site root.
    pub fn frequencies_path(&self, root: &Path) -> PathBuf {
        root.join(&self.frequencies)
    }

    /// Absolute location of the update manifest for a site root.
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest)
    }
}

/// File names inside each layout directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub layout: String,
    pub text: String,
    pub stats: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            layout: "layout.txt".to_string(),
            text: "info.txt".to_string(),
            stats: "stats.txt".to_string(),
        }
    }
}

/// Keyboard diagram settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyboardConfig {
    /// 0-based key positions followed by a visual gap.
    ///
    /// The default matches a 10-key row split: a spacer after the fifth key of
    /// each row and between the three rows.
    pub row_breaks: Vec<usize>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            row_breaks: vec![4, 14, 24],
        }
    }
}

/// Linear color ramp from heat score to RGB.
///
/// Each channel is `baseline ± slope * score`, clamped to `0..=255`. Red
/// climbs with the score, green and blue fall, so rarely used keys stay dark
/// and busy keys turn red.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatConfig {
    pub baseline: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            baseline: 70.0,
            red: 25.0,
            green: 6.0,
            blue: 8.0,
        }
    }
}

/// A link in the fixed navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Page chrome shared by every generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Site name, shown in the `<title>` after the layout name.
    pub site_title: String,
    /// Stylesheet href linked from every page.
    pub stylesheet: String,
    /// Navigation bar links, in display order.
    pub nav: Vec<NavLink>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            site_title: "Keyboard Layouts".to_string(),
            stylesheet: "/style.css".to_string(),
            nav: vec![
                NavLink {
                    label: "Home".to_string(),
                    href: "/".to_string(),
                },
                NavLink {
                    label: "Layouts".to_string(),
                    href: "/layouts/".to_string(),
                },
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Layout Pages Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Character frequency tables, one per language (JSON), relative to the site root.
frequencies = "frequencies.json"

# Update manifest: one "Name ~ Language" entry per line.
manifest = "queue.txt"

# ---------------------------------------------------------------------------
# Files expected inside every layout directory
# ---------------------------------------------------------------------------
[files]
layout = "layout.txt"
text = "info.txt"
stats = "stats.txt"

# ---------------------------------------------------------------------------
# Keyboard diagram
# ---------------------------------------------------------------------------
[keyboard]
# 0-based key positions followed by a spacer.
row_breaks = [4, 14, 24]

# ---------------------------------------------------------------------------
# Heat colors: channel = baseline +/- slope * score
# ---------------------------------------------------------------------------
[heat]
baseline = 70.0
red = 25.0
green = 6.0
blue = 8.0

# ---------------------------------------------------------------------------
# Page chrome
# ---------------------------------------------------------------------------
[page]
site_title = "Keyboard Layouts"
stylesheet = "/style.css"

[[page.nav]]
label = "Home"
href = "/"

[[page.nav]]
label = "Layouts"
href = "/layouts/"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_file_names() {
        let config = SiteConfig::default();
        assert_eq!(config.files.layout, "layout.txt");
        assert_eq!(config.files.text, "info.txt");
        assert_eq!(config.files.stats, "stats.txt");
    }

    #[test]
    fn default_config_has_row_breaks() {
        let config = SiteConfig::default();
        assert_eq!(config.keyboard.row_breaks, vec![4, 14, 24]);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[heat]
red = 30.0
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.heat.red, 30.0);
        assert_eq!(config.heat.baseline, 70.0);
        assert_eq!(config.manifest, "queue.txt");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("colour = 1");
        assert!(result.is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.frequencies, "frequencies.json");
        assert_eq!(config.page.nav.len(), 2);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
manifest = "pending.txt"

[keyboard]
row_breaks = [2, 9]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.manifest, "pending.txt");
        assert_eq!(config.keyboard.row_breaks, vec![2, 9]);
        assert_eq!(config.files.stats, "stats.txt");
        assert_eq!(config.manifest_path(tmp.path()), tmp.path().join("pending.txt"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unsorted_row_breaks_fail_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[keyboard]\nrow_breaks = [14, 4]\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_file_name_fails_validation() {
        let mut config = SiteConfig::default();
        config.files.stats = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_overlays_nested_tables() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.keyboard.row_breaks, defaults.keyboard.row_breaks);
        assert_eq!(config.page.nav, defaults.page.nav);
        assert_eq!(config.heat.blue, defaults.heat.blue);
        config.validate().unwrap();
    }
}
