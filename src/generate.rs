//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the fetched manifest and writes the
//! final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, work teaser, services, testimonials,
//!   clients and the latest posts
//! - **Listings** (`/work/`, `/blog/`, `/services/`, `/about/`, `/contact/`)
//! - **Category pages** (`/work/category/{category}/`): the work listing under
//!   one filter
//! - **Detail pages** (`/work/{slug}/`, `/blog/{slug}/`)
//! - **Not found** (`/404.html`): served by the host for unknown paths
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── about/index.html
//! ├── work/
//! │   ├── index.html
//! │   ├── category/film/index.html
//! │   └── dankira/index.html
//! ├── blog/
//! │   ├── index.html
//! │   └── connection/index.html
//! └── assets/
//!     ├── logo.svg
//!     └── placeholder.svg
//! ```
//!
//! Every page is rendered through [`resolve_route`] with the manifest as the
//! slug source, so a generated page and `urban-site render <path>` always
//! agree.

use crate::fetch::{FetchError, Manifest};
use crate::pages::Pages;
use crate::routes::{Route, resolve_route, site_routes};
use crate::sections::not_found::NotFound;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const LOGO_SVG: &str = include_str!("../static/logo.svg");
const PLACEHOLDER_SVG: &str = include_str!("../static/placeholder.svg");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] FetchError),
}

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub route: Route,
    /// Output file relative to the site root.
    pub file: String,
}

/// What [`generate_site`] wrote.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub assets: Vec<String>,
}

impl GenerateReport {
    pub fn count(&self, pred: impl Fn(&Route) -> bool) -> usize {
        self.pages.iter().filter(|p| pred(&p.route)).count()
    }
}

/// `/` → `index.html`, `/work/dankira` → `work/dankira/index.html`.
pub fn output_file(route: &Route) -> String {
    let path = route.path();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{trimmed}/index.html")
    }
}

/// Load the manifest at `manifest_path` and generate the site.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let manifest = Manifest::load(manifest_path)?;
    generate_site(&manifest, output_dir)
}

pub fn generate_site(manifest: &Manifest, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let pages = Pages::new(manifest);
    let mut report = GenerateReport::default();

    for route in site_routes(manifest) {
        let outcome = resolve_route(&pages, &route.path(), manifest);
        if !outcome.is_found() {
            // Slugs containing '/' do not route.
            warn!("skipping {}: status {}", route.path(), outcome.status);
            continue;
        }
        let file = output_file(&route);
        write_file(output_dir, &file, &outcome.html)?;
        debug!("wrote {file}");
        report.pages.push(GeneratedPage { route, file });
    }

    let not_found = pages.not_found(&NotFound::home("/404")).into_string();
    write_file(output_dir, "404.html", &not_found)?;
    report.assets.push("404.html".to_string());

    for (file, content) in [("assets/logo.svg", LOGO_SVG), ("assets/placeholder.svg", PLACEHOLDER_SVG)] {
        write_file(output_dir, file, content)?;
        report.assets.push(file.to_string());
    }

    info!("site generated at {}", output_dir.display());
    Ok(report)
}

fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path: PathBuf = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
