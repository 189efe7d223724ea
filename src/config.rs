//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the data directory next to `services.json` and `locations.json`; stock
//! defaults are overridden by whatever keys the user sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Home Repair Co."
//! phone = "(555) 555-0100"
//! base_url = "https://www.example.com"   # no trailing slash
//! contact_path = "/contact/"
//!
//! [colors]
//! background = "#ffffff"
//! text = "#1f2933"
//! accent = "#c2410c"
//! muted = "#52606d"
//!
//! [generate]
//! prune = true              # remove pages no longer in the page set
//!
//! [serve]
//! bind = "127.0.0.1:3000"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [site]
//! phone = "(301) 555-0142"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
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
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Business identity shown on every page.
    pub site: SiteInfo,
    /// Page colors, injected as CSS custom properties.
    pub colors: ColorConfig,
    /// Static generation settings.
    pub generate: GenerateConfig,
    /// Runtime resolution server settings.
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.site.phone.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.phone must not be empty".into(),
            ));
        }
        let url = &self.site.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site.base_url must start with http:// or https:// (got {url:?})"
            )));
        }
        if url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must not end with '/'".into(),
            ));
        }
        if !self.site.contact_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "site.contact_path must start with '/'".into(),
            ));
        }
        self.serve.socket_addr()?;
        Ok(())
    }
}

/// Business identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Company name used in titles and the page header.
    pub name: String,
    /// Phone number shown in calls to action.
    pub phone: String,
    /// Absolute origin used for canonical links, without trailing slash.
    pub base_url: String,
    /// Path of the contact page every call to action links to.
    pub contact_path: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Home Repair Co.".to_string(),
            phone: "(555) 555-0100".to_string(),
            base_url: "https://www.example.com".to_string(),
            contact_path: "/contact/".to_string(),
        }
    }
}

/// Colors for generated pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    /// Buttons, links and the headquarters banner.
    pub accent: String,
    /// Breadcrumbs and secondary text.
    pub muted: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2933".to_string(),
            accent: "#c2410c".to_string(),
            muted: "#52606d".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Delete previously generated pages that are no longer in the page set.
    pub prune: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self { prune: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Address the `serve` command listens on.
    pub bind: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl ServeConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "serve.bind is not a socket address: {:?}",
                self.bind
            ))
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
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

/// Load config from `config.toml` in the given directory.
///
/// Missing file means stock defaults. Merges user values on top of the
/// defaults, rejects unknown keys, and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(stock_defaults_value(), overlay)
    } else {
        stock_defaults_value()
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Service Pages Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Place this file in the data directory next to services.json and
# locations.json.

# ---------------------------------------------------------------------------
# Business identity
# ---------------------------------------------------------------------------
[site]
name = "Home Repair Co."
phone = "(555) 555-0100"

# Origin used for canonical links. No trailing slash.
base_url = "https://www.example.com"

# Every call to action links here.
contact_path = "/contact/"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#1f2933"
accent = "#c2410c"        # Buttons, links, headquarters banner
muted = "#52606d"         # Breadcrumbs, secondary text

# ---------------------------------------------------------------------------
# Static generation
# ---------------------------------------------------------------------------
[generate]
# Remove index.html files under services/ and locations/ that are no longer
# part of the page set (e.g. after a city is dropped from locations.json).
prune = true

# ---------------------------------------------------------------------------
# Runtime resolution server
# ---------------------------------------------------------------------------
[serve]
bind = "127.0.0.1:3000"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-accent: {accent};
    --color-muted: {muted};
}}"#,
        background = colors.background,
        text = colors.text,
        accent = colors.accent,
        muted = colors.muted,
    )
}
