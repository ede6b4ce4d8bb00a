//! Section renderers.
//!
//! One renderer per content kind, all behind the [`Section`] contract:
//!
//! - rendering is a pure function of the section's normalized content;
//! - an empty collection renders a skeleton, never nothing;
//! - every revealable element is registered through the [`SectionMount`]
//!   handed to `render`, and the mount is dropped when `render` returns
//!   (see [`mount_section`]);
//! - hover effects are CSS only and carry no state.
//!
//! | Section | Module | Reveal |
//! |---|---|---|
//! | Site header / nav | [`header`] | none (always visible) |
//! | Hero | [`hero`] | single block |
//! | Work grid + filter bar | [`work`] | staggered grid |
//! | Services | [`services`] | staggered list |
//! | Testimonials carousel | [`testimonials`] | single block |
//! | Trusted by | [`clients`] | staggered grid |
//! | Blog list | [`blog`] | staggered grid |
//! | Quote | [`quote`] | single block |
//! | Team | [`team`] | staggered grid |
//! | Contact | [`contact`] | form + cards |
//! | Footer | [`footer`] | single block |
//! | Not found | [`not_found`] | none |
//! | Article body | [`rich_text`] | none |

pub mod blog;
pub mod clients;
pub mod contact;
pub mod footer;
pub mod header;
pub mod hero;
pub mod not_found;
pub mod quote;
pub mod rich_text;
pub mod services;
pub mod team;
pub mod testimonials;
pub mod work;

use crate::config::SiteConfig;
use crate::reveal::{PageReveal, RevealAttrs, SectionMount};
use maud::{Markup, html};

/// Site-wide values every section may need.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
}

impl<'a> Site<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Absolute link for a site path, honouring `site.base_url`.
    /// Directory paths get a trailing slash.
    pub fn link(&self, path: &str) -> String {
        link(&self.config.site.base_url, path)
    }
}

/// `link("/", "/work")` → `/work/`; external and fragment links pass through.
pub fn link(base_url: &str, path: &str) -> String {
    if path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("mailto:")
        || path.starts_with("tel:")
        || path.starts_with('#')
    {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return format!("{base}/");
    }
    let is_file = trimmed.rsplit('/').next().is_some_and(|last| last.contains('.'));
    if is_file {
        format!("{base}/{trimmed}")
    } else {
        format!("{base}/{trimmed}/")
    }
}

/// The contract every page section implements.
pub trait Section {
    /// Prefix for the section's element handles and its CSS class.
    const NAME: &'static str;

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup;
}

/// Mount `section` on `page`, render it, and unmount it.
pub fn mount_section<S: Section>(section: &S, page: &PageReveal, site: Site<'_>) -> Markup {
    let mut mount = page.mount(S::NAME);
    section.render(&mut mount, site)
}

/// Wrap `content` in a revealable element.
pub fn revealed(attrs: &RevealAttrs, class: &str, content: Markup) -> Markup {
    html! {
        div class=(class)
            data-reveal=(attrs.state.as_str())
            data-reveal-id=(attrs.handle.as_str())
            data-threshold=(attrs.threshold)
            style=(attrs.style()) {
            (content)
        }
    }
}

/// Section heading with the small red eyebrow line.
pub fn heading(eyebrow: &str, title: &str) -> Markup {
    html! {
        header.section-heading {
            span.eyebrow { (eyebrow) }
            h2 { (title) }
        }
    }
}

/// Placeholder cards shown while a collection is empty.
pub fn skeleton(count: usize, message: &str) -> Markup {
    html! {
        div.skeleton role="status" {
            div.skeleton-grid aria-hidden="true" {
                @for _ in 0..count {
                    div.skeleton-card {}
                }
            }
            p.skeleton-message { (message) }
        }
    }
}
