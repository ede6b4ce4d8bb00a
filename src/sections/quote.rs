//! Full-width pull quote on the about page.

use super::{Section, Site, revealed};
use crate::content::Testimonial;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const HEIGHT: f64 = 320.0;

/// The studio's own line, used when no testimonial is available.
pub const STUDIO_QUOTE: &str = "Every frame is a promise: that the story is worth telling well.";

pub struct QuoteBlock<'a> {
    pub testimonial: Option<&'a Testimonial>,
}

impl Section for QuoteBlock<'_> {
    const NAME: &'static str = "quote";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let attrs = mount.reveal("quote", HEIGHT);
        let (text, author) = match self.testimonial {
            Some(t) => (t.quote.as_str(), t.author.as_str()),
            None => (STUDIO_QUOTE, site.config.site.title.as_str()),
        };
        html! {
            section.section.quote {
                (revealed(&attrs, "quote-body", html! {
                    blockquote {
                        p { "\u{201c}" (text) "\u{201d}" }
                        footer { cite { (author) } }
                    }
                }))
            }
        }
    }
}
