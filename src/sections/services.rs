//! Numbered services list.

use super::{Section, Site, heading, revealed, skeleton};
use crate::content::Service;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const ROW_HEIGHT: f64 = 140.0;
const HEADER_HEIGHT: f64 = 180.0;

pub struct ServicesList<'a> {
    pub items: &'a [Service],
}

/// `0` → `01`.
fn number(index: usize) -> String {
    format!("{:02}", index + 1)
}

impl Section for ServicesList<'_> {
    const NAME: &'static str = "services";

    fn render(&self, mount: &mut SectionMount, _site: Site<'_>) -> Markup {
        mount.skip(HEADER_HEIGHT);
        let rows = mount.reveal_grid("row", self.items.len(), 1, ROW_HEIGHT);
        html! {
            section.section.services id="services" {
                (heading("WHAT WE DO", "Services"))
                @if self.items.is_empty() {
                    (skeleton(3, "Our services will be listed here soon."))
                } @else {
                    ol.service-list {
                        @for (i, (service, attrs)) in self.items.iter().zip(&rows).enumerate() {
                            li {
                                (revealed(attrs, "service", html! {
                                    span.service-number { (number(i)) }
                                    div.service-text {
                                        h3 { (service.title) }
                                        @if let Some(description) = &service.description {
                                            p { (description) }
                                        }
                                    }
                                    @if let Some(image) = &service.image {
                                        img.service-image src=(image) alt="" loading="lazy";
                                    }
                                }))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{render_section, sample_services};

    #[test]
    fn rows_are_numbered_from_one() {
        assert_eq!(number(0), "01");
        assert_eq!(number(11), "12");
        let services = sample_services();
        let html = render_section(&ServicesList { items: &services });
        assert!(html.contains(r#"<span class="service-number">01</span>"#));
        assert!(html.contains("Film Production"));
    }

    #[test]
    fn rows_stagger_down_the_list() {
        let services = sample_services();
        let html = render_section(&ServicesList { items: &services });
        assert!(html.contains(r#"data-reveal-id="services-row-0""#));
        assert!(html.contains(r#"data-reveal-id="services-row-1""#));
        assert!(html.contains("--reveal-delay: 100ms"));
    }

    #[test]
    fn empty_list_renders_skeleton() {
        let html = render_section(&ServicesList { items: &[] });
        assert!(html.contains("skeleton"));
        assert!(!html.contains("service-list"));
    }
}
