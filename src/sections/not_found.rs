//! The not-found view.
//!
//! Unknown paths link home; an unknown work or blog slug links back to its
//! listing.

use super::{Section, Site};
use crate::reveal::SectionMount;
use maud::{Markup, html};

const HEIGHT: f64 = 480.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    /// The path that was requested.
    pub path: String,
    /// Where "go back" leads.
    pub back_href: String,
    pub back_label: String,
}

impl NotFound {
    pub fn home(path: &str) -> Self {
        Self {
            path: path.to_string(),
            back_href: "/".to_string(),
            back_label: "BACK TO HOME".to_string(),
        }
    }

    /// For a detail path whose slug matched nothing.
    pub fn listing(path: &str, listing: &str, label: &str) -> Self {
        Self {
            path: path.to_string(),
            back_href: listing.to_string(),
            back_label: format!("BACK TO {label}"),
        }
    }
}

impl Section for NotFound {
    const NAME: &'static str = "not-found";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        mount.skip(HEIGHT);
        html! {
            section.section.not-found {
                span.eyebrow { "404" }
                h1 { "We couldn't find that page." }
                p { "Nothing lives at " code { (self.path) } "." }
                a.button.cta href=(site.link(&self.back_href)) { (self.back_label) }
            }
        }
    }
}
