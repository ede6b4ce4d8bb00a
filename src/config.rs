//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! overridden by the user file, and a small set of environment variables is
//! applied last so secrets never have to live in the repository.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Urban Film Production"
//! tagline = "We tell stories with soul."
//! base_url = "/"
//!
//! [store]
//! project_id = "otwwa6lf"
//! dataset = "production"
//! api_version = "2025-01-01"
//! use_cdn = true
//! timeout_secs = 20
//! # export_file = "data.ndjson"   # read a dataset export instead of the API
//!
//! [fetch]
//! deadline_secs = 30        # sections still pending after this are dropped
//! # max_concurrent = 4      # omit for auto = CPU cores
//!
//! [images]
//! placeholder = "/assets/placeholder.svg"
//! card_width = 960
//! card_height = 720
//! hero_width = 2000
//!
//! [reveal]
//! threshold = 0.15          # fraction of the box that must be visible
//! duration_ms = 800         # 400-1000
//! stagger_ms = 100          # delay step between siblings
//! distance_px = 40          # hidden offset
//!
//! [carousel]
//! interval_ms = 6000
//!
//! [contact]
//! # endpoint = "https://forms.example.com/urban"
//! email = "info@urbanproduction.com"
//! phone = "+251 911 465 364"
//! address = ["Office, DM Geda Building,", "7th Floor, No. 701", "Addis Ababa, Ethiopia"]
//!
//! [map]
//! lat = 9.032
//! lon = 38.7469
//! zoom = 15
//! label = "DM Geda Building, 7th Floor, Addis Ababa, Ethiopia"
//!
//! [colors]
//! background = "#0a0a0a"
//! surface = "#1a2332"
//! text = "#ffffff"
//! text_muted = "#9ca3af"
//! accent = "#f40000"
//! border = "#1f2937"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Key |
//! |---|---|
//! | `SANITY_PROJECT_ID` | `store.project_id` |
//! | `SANITY_DATASET` | `store.dataset` |
//! | `SANITY_API_TOKEN` | store access token (never serialized) |
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
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

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity shown in titles and the footer.
    pub site: SiteInfo,
    /// Content store connection settings.
    pub store: StoreConfig,
    /// Section fetch scheduling.
    pub fetch: FetchConfig,
    /// Image resolution settings.
    pub images: ImagesConfig,
    /// Scroll-reveal animation parameters.
    pub reveal: RevealConfig,
    /// Auto-advancing carousel settings.
    pub carousel: CarouselConfig,
    /// Contact details and form delivery.
    pub contact: ContactConfig,
    /// Office location shown on the contact page.
    pub map: MapConfig,
    /// Color palette.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.dataset.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.dataset must not be empty".into(),
            ));
        }
        if self.store.export_file.is_none() && self.store.project_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.project_id is required unless store.export_file is set".into(),
            ));
        }
        if self.fetch.deadline_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.deadline_secs must be non-zero".into(),
            ));
        }
        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be in (0, 1]".into(),
            ));
        }
        if !(400..=1000).contains(&self.reveal.duration_ms) {
            return Err(ConfigError::Validation(
                "reveal.duration_ms must be 400-1000".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be non-zero".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.map.lat) || !(-180.0..=180.0).contains(&self.map.lon) {
            return Err(ConfigError::Validation(
                "map.lat must be -90..90 and map.lon -180..180".into(),
            ));
        }
        if self.images.card_width == 0 || self.images.card_height == 0 {
            return Err(ConfigError::Validation(
                "images card dimensions must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub tagline: String,
    /// Prefix for every internal link (`/` for a root deployment).
    pub base_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Urban Film Production".to_string(),
            tagline: "We tell stories with soul.".to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// Content store connection settings.
///
/// Built once at startup and shared read-only by every fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    /// Dated API version, e.g. `2025-01-01`.
    pub api_version: String,
    /// Query the CDN edge (`apicdn`) instead of the live API.
    pub use_cdn: bool,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Read this NDJSON dataset export instead of calling the API.
    pub export_file: Option<String>,
    /// Access token, only ever taken from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: "otwwa6lf".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-01-01".to_string(),
            use_cdn: true,
            timeout_secs: 20,
            export_file: None,
            token: None,
        }
    }
}

/// Section fetch scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Maximum number of fetches in flight.
    /// When absent, defaults to the number of CPU cores.
    pub max_concurrent: Option<usize>,
    /// Sections whose content has not arrived after this many seconds are
    /// unmounted and render their empty state.
    pub deadline_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: None,
            deadline_secs: 30,
        }
    }
}

/// Resolve the effective fetch pool size from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &FetchConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_concurrent
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// URL used whenever an image reference cannot be resolved.
    pub placeholder: String,
    /// Target size for grid cards (work, blog).
    pub card_width: u32,
    pub card_height: u32,
    /// Target width for full-bleed hero backgrounds.
    pub hero_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            placeholder: "/assets/placeholder.svg".to_string(),
            card_width: 960,
            card_height: 720,
            hero_width: 2000,
        }
    }
}

/// Scroll-reveal animation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Fraction of an element's box that must be inside the viewport.
    pub threshold: f64,
    /// Length of the hidden → shown interpolation.
    pub duration_ms: u64,
    /// Delay step between members of a staggered group.
    pub stagger_ms: u64,
    /// Vertical offset of the hidden state.
    pub distance_px: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            duration_ms: 800,
            stagger_ms: 100,
            distance_px: 40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { interval_ms: 6000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Where contact messages are POSTed. Without one, messages are only logged.
    pub endpoint: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Vec<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            email: "info@urbanproduction.com".to_string(),
            phone: "+251 911 465 364".to_string(),
            address: vec![
                "Office, DM Geda Building,".to_string(),
                "7th Floor, No. 701".to_string(),
                "Addis Ababa, Ethiopia".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    pub label: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            lat: 9.032,
            lon: 38.7469,
            zoom: 15,
            label: "DM Geda Building, 7th Floor, Addis Ababa, Ethiopia".to_string(),
        }
    }
}

/// Site color palette, exposed to the stylesheet as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    /// Panels and cards (work grid, services).
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    /// Brand red used for headings, buttons and focus rings.
    pub accent: String,
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#1a2332".to_string(),
            text: "#ffffff".to_string(),
            text_muted: "#9ca3af".to_string(),
            accent: "#f40000".to_string(),
            border: "#1f2937".to_string(),
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

/// Merge an optional overlay onto a base value, then deserialize.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Takes a lookup function rather than reading `std::env` directly so tests
/// don't have to mutate the process environment.
pub fn apply_env(config: &mut SiteConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    if let Some(project) = non_empty("SANITY_PROJECT_ID") {
        config.store.project_id = project;
    }
    if let Some(dataset) = non_empty("SANITY_DATASET") {
        config.store.dataset = dataset;
    }
    config.store.token = non_empty("SANITY_API_TOKEN");
}

/// Load config from the given `site.toml` path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// applies environment overrides, and validates the result.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    apply_env(&mut config, |name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Urban Site Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# The store access token is read from SANITY_API_TOKEN and never from this
# file. SANITY_PROJECT_ID and SANITY_DATASET override the values below.

[site]
title = "Urban Film Production"
tagline = "We tell stories with soul."
# Prefix for internal links, e.g. "/preview/" for a sub-path deployment.
base_url = "/"

# ---------------------------------------------------------------------------
# Content store
# ---------------------------------------------------------------------------
[store]
project_id = "otwwa6lf"
dataset = "production"
api_version = "2025-01-01"
# Query the CDN edge. Faster, but may lag a few seconds behind edits.
use_cdn = true
timeout_secs = 20
# Build from a dataset export (one JSON document per line) instead of the API.
# export_file = "data.ndjson"

# ---------------------------------------------------------------------------
# Fetching
# ---------------------------------------------------------------------------
[fetch]
# Sections still waiting for content after this long render their empty state.
deadline_secs = 30
# Maximum parallel queries. Omit to auto-detect (= number of CPU cores).
# max_concurrent = 4

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Shown whenever an image reference is missing or malformed.
placeholder = "/assets/placeholder.svg"
card_width = 960
card_height = 720
hero_width = 2000

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
# Fraction (0-1] of an element that must be on screen before it reveals.
threshold = 0.15
# Animation length in milliseconds (400-1000).
duration_ms = 800
# Extra delay per sibling in a staggered group.
stagger_ms = 100
# How far below its final position a hidden element sits.
distance_px = 40

# ---------------------------------------------------------------------------
# Carousels
# ---------------------------------------------------------------------------
[carousel]
interval_ms = 6000

# ---------------------------------------------------------------------------
# Contact
# ---------------------------------------------------------------------------
[contact]
# Messages are POSTed here as JSON. Without an endpoint they are only logged.
# endpoint = "https://forms.example.com/urban"
email = "info@urbanproduction.com"
phone = "+251 911 465 364"
address = ["Office, DM Geda Building,", "7th Floor, No. 701", "Addis Ababa, Ethiopia"]

# ---------------------------------------------------------------------------
# Map
# ---------------------------------------------------------------------------
[map]
lat = 9.032
lon = 38.7469
zoom = 15
label = "DM Geda Building, 7th Floor, Addis Ababa, Ethiopia"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0a0a0a"
surface = "#1a2332"
text = "#ffffff"
text_muted = "#9ca3af"
accent = "#f40000"
border = "#1f2937"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
    --color-border: {border};
}}"#,
        background = colors.background,
        surface = colors.surface,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
        border = colors.border,
    )
}

/// Generate CSS custom properties from reveal config.
///
/// The stylesheet uses these for the hidden state and the transition, so the
/// script only has to flip a data attribute.
pub fn generate_reveal_css(reveal: &RevealConfig) -> String {
    format!(
        r#":root {{
    --reveal-duration: {duration}ms;
    --reveal-distance: {distance}px;
}}"#,
        duration = reveal.duration_ms,
        distance = reveal.distance_px,
    )
}
