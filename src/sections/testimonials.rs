//! Testimonials carousel.
//!
//! The slides are all in the markup; `carousel.js` cycles them every
//! `carousel.interval_ms`, pauses on hover or focus, and stops when the
//! element leaves the document. Without script the first slide shows and the
//! dots still jump between slides through their fragment links.

use super::{Section, Site, heading, revealed, skeleton};
use crate::carousel::AutoAdvance;
use crate::content::Testimonial;
use crate::reveal::SectionMount;
use maud::{Markup, html};
use std::time::Duration;

const HEIGHT: f64 = 420.0;

pub struct TestimonialsCarousel<'a> {
    pub items: &'a [Testimonial],
}

impl Section for TestimonialsCarousel<'_> {
    const NAME: &'static str = "testimonials";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let attrs = mount.reveal("carousel", HEIGHT);
        let interval = site.config.carousel.interval_ms;
        // The script is only attached when the timer would run.
        let rotates = AutoAdvance::new(self.items.len(), Duration::from_millis(interval)).is_active();
        html! {
            section.section.testimonials id="testimonials" {
                (heading("TESTIMONIALS", "What our clients say"))
                @if self.items.is_empty() {
                    (skeleton(1, "Kind words are on their way."))
                } @else {
                    (revealed(&attrs, "carousel-frame", html! {
                        div.carousel data-carousel[rotates] data-interval=[rotates.then_some(interval)] aria-roledescription="carousel" {
                            @for (i, t) in self.items.iter().enumerate() {
                                figure.slide.active[i == 0]
                                    id=(format!("testimonial-{i}"))
                                    data-slide=(i)
                                    aria-hidden=[(i != 0).then_some("true")] {
                                    blockquote { p { (t.quote) } }
                                    figcaption {
                                        strong { (t.author) }
                                        @if let Some(role) = &t.role {
                                            span.role { (role) }
                                        }
                                    }
                                }
                            }
                            @if self.items.len() > 1 {
                                nav.carousel-dots aria-label="Choose testimonial" {
                                    @for i in 0..self.items.len() {
                                        a.dot.active[i == 0]
                                            href=(format!("#testimonial-{i}"))
                                            data-go=(i)
                                            aria-label=(format!("Testimonial {}", i + 1)) {}
                                    }
                                }
                            }
                        }
                    }))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::{render_section, render_section_with, sample_testimonials};

    #[test]
    fn first_slide_is_active() {
        let items = sample_testimonials();
        let html = render_section(&TestimonialsCarousel { items: &items });
        assert!(html.contains(r#"class="slide active""#));
        assert_eq!(html.matches(r#"aria-hidden="true""#).count(), items.len() - 1);
    }

    #[test]
    fn carries_configured_interval() {
        let items = sample_testimonials();
        let html = render_section(&TestimonialsCarousel { items: &items });
        assert!(html.contains(r#"data-interval="6000""#));
        assert!(html.contains(r##"href="#testimonial-1""##));
    }

    #[test]
    fn single_testimonial_has_no_dots_and_does_not_rotate() {
        let items = sample_testimonials()[..1].to_vec();
        let html = render_section(&TestimonialsCarousel { items: &items });
        assert!(!html.contains("carousel-dots"));
        assert!(!html.contains("data-carousel"));
        assert!(!html.contains("data-interval"));
    }

    #[test]
    fn zero_interval_disables_rotation() {
        let items = sample_testimonials();
        let mut config = SiteConfig::default();
        config.carousel.interval_ms = 0;
        let html = render_section_with(&TestimonialsCarousel { items: &items }, &config);
        assert!(!html.contains("data-carousel"));
        assert!(html.contains("carousel-dots"));
    }

    #[test]
    fn empty_renders_skeleton() {
        let html = render_section(&TestimonialsCarousel { items: &[] });
        assert!(html.contains("skeleton"));
        assert!(!html.contains("data-carousel"));
    }
}
