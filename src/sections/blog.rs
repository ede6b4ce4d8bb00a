//! Blog listing cards and post pages.

use super::rich_text::render_blocks;
use super::{Section, Site, heading, revealed, skeleton};
use crate::content::BlogPost;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const COLUMNS: usize = 3;
const ROW_HEIGHT: f64 = 460.0;
const HEADER_HEIGHT: f64 = 180.0;

pub struct BlogList<'a> {
    pub items: &'a [BlogPost],
    /// Show at most this many posts (home page teaser).
    pub limit: Option<usize>,
}

/// Detail path for a post with a slug.
pub fn post_path(post: &BlogPost) -> Option<String> {
    post.slug.as_ref().map(|slug| format!("/blog/{slug}"))
}

fn card(post: &BlogPost, site: Site<'_>) -> Markup {
    let body = html! {
        figure.card-image {
            img src=(post.image) alt=(post.title) loading="lazy";
        }
        div.card-body {
            @if let Some(category) = &post.category {
                span.card-category { (category) }
            }
            h3 { (post.title) }
            @if let Some(excerpt) = &post.excerpt {
                p.card-excerpt { (excerpt) }
            }
            @if let Some(date) = post.date() {
                time datetime=(date) { (date) }
            }
        }
    };
    html! {
        @match post_path(post) {
            Some(path) => a.card-link href=(site.link(&path)) { (body) },
            None => div.card-link { (body) },
        }
    }
}

impl Section for BlogList<'_> {
    const NAME: &'static str = "blog";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        mount.skip(HEADER_HEIGHT);
        let shown = match self.limit {
            Some(limit) => &self.items[..limit.min(self.items.len())],
            None => self.items,
        };
        let cells = mount.reveal_grid("card", shown.len(), COLUMNS, ROW_HEIGHT);
        html! {
            section.section.blog id="blog" {
                (heading("BLOGS", "Stories from the studio"))
                @if shown.is_empty() {
                    (skeleton(COLUMNS, "No stories yet. Check back soon."))
                } @else {
                    div.card-grid {
                        @for (post, attrs) in shown.iter().zip(&cells) {
                            (revealed(attrs, "card", card(post, site)))
                        }
                    }
                }
                @if self.limit.is_some_and(|l| self.items.len() > l) {
                    a.button.more href=(site.link("/blog")) { "READ MORE STORIES" }
                }
            }
        }
    }
}

/// A single post page.
pub struct PostDetail<'a> {
    pub post: &'a BlogPost,
}

impl Section for PostDetail<'_> {
    const NAME: &'static str = "post";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let post = self.post;
        mount.skip(HEADER_HEIGHT);
        let image = mount.reveal("image", ROW_HEIGHT);
        let body = mount.reveal("body", ROW_HEIGHT);
        html! {
            article.section.post-detail {
                header.section-heading {
                    @if let Some(category) = &post.category {
                        span.eyebrow { (category) }
                    }
                    h1 { (post.title) }
                    @if let Some(date) = post.date() {
                        time datetime=(date) { (date) }
                    }
                }
                (revealed(&image, "detail-media", html! {
                    img src=(post.image) alt=(post.title);
                }))
                (revealed(&body, "detail-body", render_blocks(&post.body)))
                a.back href=(site.link("/blog")) { "← BACK TO BLOGS" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{render_section, sample_posts};

    #[test]
    fn cards_link_to_post_pages() {
        let posts = sample_posts();
        let html = render_section(&BlogList { items: &posts, limit: None });
        assert!(html.contains(r#"href="/blog/connection/""#));
        assert!(html.contains(r#"<time datetime="2025-03-14">"#));
    }

    #[test]
    fn post_without_slug_is_not_a_link() {
        let mut post = sample_posts().remove(0);
        post.slug = None;
        assert_eq!(post_path(&post), None);
        let html = render_section(&BlogList { items: &[post], limit: None });
        assert!(html.contains(r#"<div class="card-link">"#));
    }

    #[test]
    fn post_page_renders_body() {
        let posts = sample_posts();
        let html = render_section(&PostDetail { post: &posts[0] });
        assert!(html.contains("<h1>The Power of Connection</h1>"));
        assert!(html.contains("<p>Every story starts with listening.</p>"));
        assert!(html.contains(r#"href="/blog/""#));
    }

    #[test]
    fn empty_list_renders_skeleton() {
        let html = render_section(&BlogList { items: &[], limit: None });
        assert!(html.contains("No stories yet"));
    }

    #[test]
    fn limit_truncates_and_links_to_listing() {
        let posts = sample_posts();
        let html = render_section(&BlogList { items: &posts, limit: Some(1) });
        assert_eq!(html.matches("data-reveal-id=\"blog-card-").count(), 1);
        assert!(html.contains("READ MORE STORIES"));
    }
}
