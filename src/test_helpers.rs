//! Shared test utilities.
//!
//! Sample records for every section, a one-call section renderer, and
//! lookups that panic with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let works = sample_works();
//! let html = render_section(&WorkGrid::all(&works));
//! assert!(html.contains("DANKIRA"));
//!
//! let manifest = sample_manifest();
//! let item = find_work(&manifest, "dankira");
//! ```

use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{BlogPost, ClientLogo, Service, Testimonial, WorkItem};
use crate::fetch::{Loaded, Manifest};
use crate::reveal::PageReveal;
use crate::sections::{Section, Site, mount_section};
use crate::types::{Block, Span};

// =========================================================================
// Rendering
// =========================================================================

/// Render one section on a fresh page with the default config.
pub fn render_section<S: Section>(section: &S) -> String {
    render_section_with(section, &SiteConfig::default())
}

pub fn render_section_with<S: Section>(section: &S, config: &SiteConfig) -> String {
    let page = PageReveal::from_config(&config.reveal);
    mount_section(section, &page, Site::new(config)).into_string()
}

// =========================================================================
// Fixtures
// =========================================================================

/// Path to the NDJSON export used as an offline store.
pub fn fixture_export() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/export.ndjson")
}

// =========================================================================
// Sample records
// =========================================================================

fn paragraph(text: &str) -> Block {
    Block {
        style: "normal".to_string(),
        spans: vec![Span {
            text: text.to_string(),
            marks: vec![],
        }],
    }
}

fn work(slug: &str, title: &str, category: &str) -> WorkItem {
    WorkItem {
        id: format!("work-{slug}"),
        slug: Some(slug.to_string()),
        title: title.to_string(),
        subtitle: None,
        categories: vec![category.to_string()],
        thumbnail: "/assets/placeholder.svg".to_string(),
        video_url: None,
        body: vec![paragraph(&format!("About {title}."))],
    }
}

/// DANKIRA (Film), KOBA (Photography), HABESHA (Film), in that order.
pub fn sample_works() -> Vec<WorkItem> {
    vec![
        work("dankira", "DANKIRA", "Film"),
        work("koba", "KOBA", "Photography"),
        work("habesha", "HABESHA", "Film"),
    ]
}

pub fn sample_services() -> Vec<Service> {
    ["Film Production", "Photography", "Brand Design"]
        .iter()
        .enumerate()
        .map(|(i, title)| Service {
            id: format!("service-{i}"),
            title: title.to_string(),
            description: Some(format!("{title} from concept to delivery.")),
            image: None,
        })
        .collect()
}

pub fn sample_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            id: "t-1".to_string(),
            quote: "They understood our story before we did.".to_string(),
            author: "Selam Tesfaye".to_string(),
            role: Some("Marketing Lead".to_string()),
        },
        Testimonial {
            id: "t-2".to_string(),
            quote: "A crew that cares about every frame.".to_string(),
            author: "Dawit Bekele".to_string(),
            role: None,
        },
        Testimonial {
            id: "t-3".to_string(),
            quote: "On time, on budget, and beautiful.".to_string(),
            author: "Meron Alemu".to_string(),
            role: Some("Founder".to_string()),
        },
    ]
}

/// Two posts; the first has slug `connection`, published 2025-03-14.
pub fn sample_posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            id: "post-connection".to_string(),
            slug: Some("connection".to_string()),
            title: "The Power of Connection".to_string(),
            excerpt: Some("Why every brand film starts with a conversation.".to_string()),
            image: "/assets/placeholder.svg".to_string(),
            category: Some("Insights".to_string()),
            published_at: Some("2025-03-14T09:00:00Z".to_string()),
            body: vec![paragraph("Every story starts with listening.")],
        },
        BlogPost {
            id: "post-light".to_string(),
            slug: Some("working-with-light".to_string()),
            title: "Working With Light".to_string(),
            excerpt: None,
            image: "/assets/placeholder.svg".to_string(),
            category: None,
            published_at: Some("2025-01-20T09:00:00Z".to_string()),
            body: vec![paragraph("Natural light is a collaborator.")],
        },
    ]
}

pub fn sample_clients() -> Vec<ClientLogo> {
    ["Ethio Telecom", "Safaricom", "Habesha Breweries"]
        .iter()
        .map(|name| ClientLogo {
            id: format!("client-{}", crate::content::slugify(name)),
            name: name.to_string(),
            logo: "/assets/placeholder.svg".to_string(),
        })
        .collect()
}

/// A manifest with every collection populated from the samples above.
pub fn sample_manifest() -> Manifest {
    let mut manifest = Manifest::empty(SiteConfig::default());
    manifest.works = Loaded::new(sample_works());
    manifest.services = Loaded::new(sample_services());
    manifest.testimonials = Loaded::new(sample_testimonials());
    manifest.posts = Loaded::new(sample_posts());
    manifest.clients = Loaded::new(sample_clients());
    manifest
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a work item by slug. Panics if not found.
pub fn find_work<'a>(manifest: &'a Manifest, slug: &str) -> &'a WorkItem {
    manifest
        .works
        .items
        .iter()
        .find(|w| w.slug.as_deref() == Some(slug))
        .unwrap_or_else(|| {
            let slugs: Vec<_> = manifest.works.items.iter().filter_map(|w| w.slug.as_deref()).collect();
            panic!("work '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a blog post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a BlogPost {
    manifest
        .posts
        .items
        .iter()
        .find(|p| p.slug.as_deref() == Some(slug))
        .unwrap_or_else(|| {
            let slugs: Vec<_> = manifest.posts.items.iter().filter_map(|p| p.slug.as_deref()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}
