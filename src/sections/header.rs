//! Site header: logo, menu and call to action.
//!
//! Always painted visible. The menu collapses behind a checkbox toggle on
//! narrow screens, so it works without script.

use super::{Section, Site};
use crate::content::SiteHeader;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const HEIGHT: f64 = 88.0;

pub struct HeaderSection<'a> {
    pub header: &'a SiteHeader,
    /// Path of the page being rendered, for the current-item marker.
    pub current: &'a str,
}

/// `/work/dankira` is inside `/work`; `/` only matches itself.
fn is_current(href: &str, current: &str) -> bool {
    let href = href.trim_end_matches('/');
    let current = current.trim_end_matches('/');
    if href.is_empty() {
        return current.is_empty();
    }
    current == href || current.starts_with(&format!("{href}/"))
}

impl Section for HeaderSection<'_> {
    const NAME: &'static str = "header";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        mount.skip(HEIGHT);
        html! {
            header.site-header {
                a.logo href=(site.link("/")) {
                    img src=(site.link(&self.header.logo)) alt=(site.config.site.title) height="40";
                }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" aria-label="Menu" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                nav.site-nav {
                    ul {
                        @for item in &self.header.menu {
                            li class=[is_current(&item.href, self.current).then_some("current")] {
                                a href=(site.link(&item.href)) { (item.label) }
                            }
                        }
                    }
                    a.button.cta href=(site.link(&self.header.cta.href)) { (self.header.cta.label) }
                }
            }
        }
    }
}
