//! Image reference resolution.
//!
//! Image fields never hold a usable URL; they hold an asset reference such as
//! `image-3f9a1c0b2e-1920x1080-jpg`. [`ImageResolver::resolve`] maps that
//! token to a CDN URL:
//!
//! ```text
//! image-<asset>-<W>x<H>-<ext>
//!   → https://cdn.sanity.io/images/<project>/<dataset>/<asset>-<W>x<H>.<ext>?w=..&h=..&fit=crop&crop=..
//! ```
//!
//! The base URL depends only on the token; width, height and crop only add
//! query parameters. Absolute URLs and site-relative paths pass through
//! untouched. Anything else resolves to the configured placeholder.

use crate::config::{ImagesConfig, StoreConfig};
use crate::types::ImageRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

#[derive(Error, Debug, PartialEq)]
pub enum ImageError {
    #[error("malformed image reference: {0:?}")]
    Malformed(String),
}

/// Crop anchor passed through to the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    Entropy,
}

impl Crop {
    fn as_str(self) -> &'static str {
        match self {
            Crop::Center => "center",
            Crop::Top => "top",
            Crop::Bottom => "bottom",
            Crop::Left => "left",
            Crop::Right => "right",
            Crop::Entropy => "entropy",
        }
    }
}

/// Optional display parameters for a resolved image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<Crop>,
}

impl ImageParams {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn cropped(width: u32, height: u32, crop: Crop) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            crop: Some(crop),
        }
    }

    fn query(&self) -> String {
        let mut parts = Vec::new();
        if let Some(w) = self.width {
            parts.push(format!("w={w}"));
        }
        if let Some(h) = self.height {
            parts.push(format!("h={h}"));
        }
        if let Some(crop) = self.crop {
            parts.push("fit=crop".to_string());
            parts.push(format!("crop={}", crop.as_str()));
        }
        parts.join("&")
    }
}

/// Named display sizes used by the section renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Grid cards (work, blog).
    Card,
    /// Full-bleed hero and article header images.
    Hero,
    /// Client logos and the site logo.
    Logo,
    /// Team portraits.
    Portrait,
}

/// The parsed parts of an asset reference.
#[derive(Debug, PartialEq, Eq)]
struct AssetId<'a> {
    id: &'a str,
    dimensions: &'a str,
    format: &'a str,
}

fn parse_reference(token: &str) -> Result<AssetId<'_>, ImageError> {
    let malformed = || ImageError::Malformed(token.to_string());
    let rest = token.strip_prefix("image-").ok_or_else(malformed)?;
    let (rest, format) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (id, dimensions) = rest.rsplit_once('-').ok_or_else(malformed)?;

    let alnum = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
    let dims_ok = dimensions
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());

    if alnum(id) && alnum(format) && dims_ok {
        Ok(AssetId {
            id,
            dimensions,
            format,
        })
    } else {
        Err(malformed())
    }
}

/// Resolves image references against one project/dataset.
///
/// Cheap to clone; holds only the strings it needs.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    project_id: String,
    dataset: String,
    placeholder: String,
    card: (u32, u32),
    hero_width: u32,
}

impl ImageResolver {
    pub fn new(store: &StoreConfig, images: &ImagesConfig) -> Self {
        Self {
            project_id: store.project_id.clone(),
            dataset: store.dataset.clone(),
            placeholder: images.placeholder.clone(),
            card: (images.card_width, images.card_height),
            hero_width: images.hero_width,
        }
    }

    pub fn params(&self, preset: Preset) -> ImageParams {
        match preset {
            Preset::Card => ImageParams::cropped(self.card.0, self.card.1, Crop::Center),
            Preset::Hero => ImageParams::width(self.hero_width),
            Preset::Logo => ImageParams::width(320),
            Preset::Portrait => ImageParams::cropped(600, 750, Crop::Top),
        }
    }

    /// Resolve an optional image field at a named size.
    pub fn preset(&self, reference: Option<&ImageRef>, preset: Preset) -> String {
        self.resolve_or_placeholder(reference, self.params(preset))
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Resolve a reference to a URL. Never fails: malformed references yield
    /// the placeholder.
    pub fn resolve(&self, reference: &ImageRef, params: ImageParams) -> String {
        match self.try_resolve(reference, params) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("{e}, using placeholder");
                self.placeholder.clone()
            }
        }
    }

    /// Like [`resolve`](Self::resolve) for an optional field.
    pub fn resolve_or_placeholder(&self, reference: Option<&ImageRef>, params: ImageParams) -> String {
        match reference {
            Some(r) => self.resolve(r, params),
            None => self.placeholder.clone(),
        }
    }

    fn try_resolve(&self, reference: &ImageRef, params: ImageParams) -> Result<String, ImageError> {
        let token = reference.0.trim();
        if token.starts_with("https://") || token.starts_with("http://") || token.starts_with('/') {
            return Ok(token.to_string());
        }
        let asset = parse_reference(token)?;
        let base = format!(
            "{CDN_BASE}/{}/{}/{}-{}.{}",
            self.project_id, self.dataset, asset.id, asset.dimensions, asset.format
        );
        let query = params.query();
        if query.is_empty() {
            Ok(base)
        } else {
            Ok(format!("{base}?{query}"))
        }
    }
}
