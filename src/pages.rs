//! Page composition.
//!
//! Every page is the site header, a sequence of sections mounted on one
//! [`PageReveal`], and the footer, wrapped in [`base_document`]. Sections are
//! mounted in reading order so the first-paint layout matches the page.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into every page:
//! - `static/style.css`: base styles (colors and reveal timing injected from config)
//! - `static/reveal.js`: scroll reveal, the browser half of [`crate::reveal`]
//! - `static/carousel.js`: testimonial auto-advance
//! - `static/contact.js`: inline contact form validation and submission

use crate::config;
use crate::contact::ContactSession;
use crate::content::{BlogPost, WorkItem};
use crate::fetch::Manifest;
use crate::reveal::PageReveal;
use crate::sections::blog::{BlogList, PostDetail};
use crate::sections::clients::ClientsWall;
use crate::sections::contact::ContactSection;
use crate::sections::footer::Footer;
use crate::sections::header::HeaderSection;
use crate::sections::hero::{HeroSection, PageBanner};
use crate::sections::not_found::NotFound;
use crate::sections::quote::QuoteBlock;
use crate::sections::services::ServicesList;
use crate::sections::team::TeamGrid;
use crate::sections::testimonials::TestimonialsCarousel;
use crate::sections::work::{WorkDetail, WorkGrid};
use crate::sections::{Site, mount_section};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const REVEAL_JS: &str = include_str!("../static/reveal.js");
const CAROUSEL_JS: &str = include_str!("../static/carousel.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// Home page teaser sizes.
const HOME_WORKS: usize = 6;
const HOME_POSTS: usize = 3;

/// Full stylesheet: config-driven custom properties, then the static rules.
pub fn stylesheet(config: &config::SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_reveal_css(&config.reveal),
        CSS_STATIC
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Document shell. The `js` class on `<html>` is set before first paint so
/// hidden reveal states only apply when the script will run.
fn base_document(title: &str, description: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(description);
                title { (title) }
                script { (PreEscaped("document.documentElement.classList.add('js');")) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
                script { (PreEscaped(REVEAL_JS)) }
                script { (PreEscaped(CAROUSEL_JS)) }
                script { (PreEscaped(CONTACT_JS)) }
            }
        }
    }
}

/// Renders pages from one manifest.
pub struct Pages<'a> {
    manifest: &'a Manifest,
    css: String,
}

impl<'a> Pages<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            css: stylesheet(&manifest.config),
        }
    }

    pub fn manifest(&self) -> &'a Manifest {
        self.manifest
    }

    fn site(&self) -> Site<'a> {
        Site::new(&self.manifest.config)
    }

    /// Header, `body`, footer on a fresh reveal page.
    fn page(
        &self,
        title: Option<&str>,
        current: &str,
        body_class: &str,
        body: impl FnOnce(&PageReveal, Site<'a>) -> Markup,
    ) -> Markup {
        let site = self.site();
        let info = &self.manifest.config.site;
        let reveal = PageReveal::from_config(&self.manifest.config.reveal);
        let header = &self.manifest.header;
        let top = mount_section(&HeaderSection { header, current }, &reveal, site);
        let inner = body(&reveal, site);
        let bottom = mount_section(&Footer { header }, &reveal, site);
        let full_title = match title {
            Some(t) => format!("{t} | {}", info.title),
            None => info.title.clone(),
        };
        let content = html! {
            (top)
            main { (inner) }
            (bottom)
        };
        base_document(&full_title, &info.tagline, &self.css, Some(body_class), content)
    }

    // ========================================================================
    // Page Renderers
    // ========================================================================

    pub fn home(&self) -> Markup {
        let m = self.manifest;
        self.page(None, "/", "home", |reveal, site| {
            html! {
                (mount_section(&HeroSection { hero: &m.hero }, reveal, site))
                (mount_section(&WorkGrid {
                    limit: Some(HOME_WORKS),
                    show_filters: false,
                    ..WorkGrid::all(&m.works.items)
                }, reveal, site))
                (mount_section(&ServicesList { items: &m.services.items }, reveal, site))
                (mount_section(&TestimonialsCarousel { items: &m.testimonials.items }, reveal, site))
                (mount_section(&ClientsWall { items: &m.clients.items }, reveal, site))
                (mount_section(&BlogList { items: &m.posts.items, limit: Some(HOME_POSTS) }, reveal, site))
            }
        })
    }

    pub fn about(&self) -> Markup {
        let m = self.manifest;
        self.page(Some("About Us"), "/about", "about", |reveal, site| {
            html! {
                (mount_section(&PageBanner {
                    eyebrow: "ABOUT US",
                    title: &m.config.site.tagline,
                    image: m.hero.background.as_deref(),
                }, reveal, site))
                (mount_section(&QuoteBlock { testimonial: m.testimonials.items.first() }, reveal, site))
                (mount_section(&TeamGrid { items: &m.team.items }, reveal, site))
                (mount_section(&ClientsWall { items: &m.clients.items }, reveal, site))
            }
        })
    }

    pub fn services(&self) -> Markup {
        let m = self.manifest;
        self.page(Some("Services"), "/services", "services", |reveal, site| {
            html! {
                (mount_section(&PageBanner { eyebrow: "SERVICES", title: "What we do", image: None }, reveal, site))
                (mount_section(&ServicesList { items: &m.services.items }, reveal, site))
                (mount_section(&TestimonialsCarousel { items: &m.testimonials.items }, reveal, site))
            }
        })
    }

    /// The work listing under `filter` ([`crate::content::ALL_FILTER`] for all).
    pub fn work(&self, filter: &str) -> Markup {
        let m = self.manifest;
        self.page(Some("Work"), "/work", "work", |reveal, site| {
            html! {
                (mount_section(&WorkGrid { filter, ..WorkGrid::all(&m.works.items) }, reveal, site))
            }
        })
    }

    pub fn work_detail(&self, item: &WorkItem) -> Markup {
        self.page(Some(item.title.as_str()), "/work", "work-detail", |reveal, site| {
            mount_section(&WorkDetail { item }, reveal, site)
        })
    }

    pub fn blog(&self) -> Markup {
        let m = self.manifest;
        self.page(Some("Blogs"), "/blog", "blog", |reveal, site| {
            html! {
                (mount_section(&BlogList { items: &m.posts.items, limit: None }, reveal, site))
            }
        })
    }

    pub fn post(&self, post: &BlogPost) -> Markup {
        self.page(Some(post.title.as_str()), "/blog", "post", |reveal, site| {
            mount_section(&PostDetail { post }, reveal, site)
        })
    }

    pub fn contact(&self, session: &ContactSession) -> Markup {
        self.page(Some("Contact Us"), "/contact", "contact", |reveal, site| {
            html! {
                (mount_section(&PageBanner {
                    eyebrow: "CONTACT US",
                    title: "Let's work together",
                    image: None,
                }, reveal, site))
                (mount_section(&ContactSection { session }, reveal, site))
            }
        })
    }

    pub fn not_found(&self, view: &NotFound) -> Markup {
        self.page(Some("Not found"), &view.path, "not-found", |reveal, site| {
            mount_section(view, reveal, site)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_manifest;

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", "", "body {}", None, content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("classList.add('js')"));
    }

    #[test]
    fn base_document_applies_body_class() {
        let doc = base_document("Test", "", "", Some("home"), html! {}).into_string();
        assert!(doc.contains(r#"<body class="home">"#));
    }

    #[test]
    fn stylesheet_starts_with_custom_properties() {
        let css = stylesheet(&config::SiteConfig::default());
        assert!(css.contains("--color-accent"));
        assert!(css.contains("--reveal-duration: 800ms"));
        assert!(css.contains("[data-reveal"));
    }

    #[test]
    fn home_composes_every_section() {
        let manifest = sample_manifest();
        let html = Pages::new(&manifest).home().into_string();
        for class in ["site-header", "hero", "work", "services", "testimonials", "clients", "blog", "site-footer"] {
            assert!(html.contains(class), "missing {class}");
        }
        assert!(html.contains("<title>Urban Film Production</title>"));
    }

    #[test]
    fn hero_is_painted_revealed_and_lower_sections_hidden() {
        let manifest = sample_manifest();
        let html = Pages::new(&manifest).home().into_string();
        assert!(html.contains(r#"data-reveal="revealed" data-reveal-id="hero-content""#));
        assert!(html.contains(r#"data-reveal="hidden" data-reveal-id="blog-card-0""#));
    }

    #[test]
    fn empty_manifest_renders_skeletons_not_errors() {
        let manifest = Manifest::empty(config::SiteConfig::default());
        let html = Pages::new(&manifest).home().into_string();
        assert!(html.contains("New work is on its way."));
        assert!(html.contains("No stories yet"));
    }

    #[test]
    fn detail_titles_include_site_name() {
        let manifest = sample_manifest();
        let pages = Pages::new(&manifest);
        let html = pages.work_detail(&manifest.works.items[0]).into_string();
        assert!(html.contains("<title>DANKIRA | Urban Film Production</title>"));
    }
}
