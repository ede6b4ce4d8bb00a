use super::{Section, Site, revealed};
use crate::content::SiteHeader;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const HEIGHT: f64 = 320.0;

pub struct Footer<'a> {
    pub header: &'a SiteHeader,
}

impl Section for Footer<'_> {
    const NAME: &'static str = "footer";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let attrs = mount.reveal("columns", HEIGHT);
        let info = &site.config.site;
        let contact = &site.config.contact;
        html! {
            footer.site-footer {
                (revealed(&attrs, "footer-columns", html! {
                    div.footer-brand {
                        img src=(site.link(&self.header.logo)) alt=(info.title) height="32";
                        p { (info.tagline) }
                    }
                    nav.footer-nav aria-label="Footer" {
                        ul {
                            @for item in &self.header.menu {
                                li { a href=(site.link(&item.href)) { (item.label) } }
                            }
                        }
                    }
                    div.footer-contact {
                        a href=(format!("mailto:{}", contact.email)) { (contact.email) }
                        span { (contact.phone) }
                    }
                }))
                p.copyright { "© " (info.title) ". All rights reserved." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::render_section;

    #[test]
    fn footer_repeats_menu_and_contact() {
        let header = SiteHeader::default();
        let html = render_section(&Footer { header: &header });
        assert!(html.contains("© Urban Film Production"));
        assert!(html.contains(r#"href="/services/""#));
        assert!(html.contains("mailto:info@urbanproduction.com"));
    }
}
