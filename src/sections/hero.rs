use super::{Section, Site, revealed};
use crate::content::Hero;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const HEIGHT: f64 = 640.0;
const BANNER_HEIGHT: f64 = 320.0;

pub struct HeroSection<'a> {
    pub hero: &'a Hero,
}

/// Title banner at the top of inner pages.
pub struct PageBanner<'a> {
    pub eyebrow: &'a str,
    pub title: &'a str,
    pub image: Option<&'a str>,
}

impl Section for PageBanner<'_> {
    const NAME: &'static str = "banner";

    fn render(&self, mount: &mut SectionMount, _site: Site<'_>) -> Markup {
        let attrs = mount.reveal("title", BANNER_HEIGHT);
        let style = self.image.map(|url| format!("background-image: url('{url}')"));
        html! {
            section.page-banner style=[style] {
                div.hero-overlay {}
                (revealed(&attrs, "banner-content", html! {
                    span.eyebrow { (self.eyebrow) }
                    h1 { (self.title) }
                }))
            }
        }
    }
}

impl Section for HeroSection<'_> {
    const NAME: &'static str = "hero";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let attrs = mount.reveal("content", HEIGHT);
        let style = self
            .hero
            .background
            .as_ref()
            .map(|url| format!("background-image: url('{url}')"));
        html! {
            section.hero style=[style] {
                div.hero-overlay {}
                (revealed(&attrs, "hero-content", html! {
                    h1 { (self.hero.title) }
                    p.hero-subtitle { (self.hero.subtitle) }
                    a.button.cta href=(site.link(&self.hero.cta_link)) {
                        (self.hero.cta_text)
                        span.arrow aria-hidden="true" { "→" }
                    }
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::render_section;

    #[test]
    fn hero_is_revealed_on_first_paint() {
        let hero = Hero::default();
        let html = render_section(&HeroSection { hero: &hero });
        assert!(html.contains(r#"data-reveal="revealed""#));
        assert!(!html.contains(r#"data-reveal="hidden""#));
        assert!(html.contains("Get Started"));
    }

    #[test]
    fn background_image_is_inline_style() {
        let hero = Hero {
            background: Some("https://cdn.example/bg.jpg".to_string()),
            ..Hero::default()
        };
        let html = render_section(&HeroSection { hero: &hero });
        assert!(html.contains("background-image: url('https://cdn.example/bg.jpg')"));
    }

    #[test]
    fn banner_renders_title_revealed() {
        let html = render_section(&PageBanner {
            eyebrow: "OUR WORK",
            title: "Stories we have told",
            image: None,
        });
        assert!(html.contains("<h1>Stories we have told</h1>"));
        assert!(html.contains(r#"data-reveal-id="banner-title""#));
        assert!(!html.contains("style=\"background-image"));
    }
}
