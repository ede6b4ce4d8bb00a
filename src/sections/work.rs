//! Work grid with its category filter bar.
//!
//! Filtering is a projection of the fetched collection through
//! [`filter_works`]: it removes cards, never reorders them, and never
//! fetches. Each filter is its own static page, so the bar is plain links.

use super::rich_text::render_blocks;
use super::{Section, Site, heading, revealed, skeleton};
use crate::content::{ALL_FILTER, WorkItem, category_slug, filter_works, same_category, work_filters};
use crate::reveal::SectionMount;
use maud::{Markup, html};

const COLUMNS: usize = 3;
const ROW_HEIGHT: f64 = 420.0;
const HEADER_HEIGHT: f64 = 180.0;

pub struct WorkGrid<'a> {
    pub items: &'a [WorkItem],
    /// Active filter; [`ALL_FILTER`] or a category name.
    pub filter: &'a str,
    /// Show at most this many cards (home page teaser).
    pub limit: Option<usize>,
    pub show_filters: bool,
}

impl<'a> WorkGrid<'a> {
    pub fn all(items: &'a [WorkItem]) -> Self {
        Self {
            items,
            filter: ALL_FILTER,
            limit: None,
            show_filters: true,
        }
    }
}

/// Listing path for a filter.
pub fn filter_path(filter: &str) -> String {
    if same_category(filter, ALL_FILTER) {
        "/work".to_string()
    } else {
        format!("/work/category/{}", category_slug(filter))
    }
}

/// Where a card links: its detail page, else its video, else nowhere.
fn card_target(item: &WorkItem) -> Option<String> {
    match (&item.slug, &item.video_url) {
        (Some(slug), _) => Some(format!("/work/{slug}")),
        (None, Some(video)) => Some(video.clone()),
        (None, None) => None,
    }
}

fn card(item: &WorkItem, site: Site<'_>) -> Markup {
    let body = html! {
        figure.card-image {
            img src=(item.thumbnail) alt=(item.title) loading="lazy";
        }
        div.card-body {
            span.card-category { (item.category()) }
            h3 { (item.title) }
            @if let Some(subtitle) = &item.subtitle {
                p.card-subtitle { (subtitle) }
            }
        }
    };
    html! {
        @match card_target(item) {
            Some(href) => a.card-link href=(site.link(&href)) { (body) },
            None => div.card-link { (body) },
        }
    }
}

impl Section for WorkGrid<'_> {
    const NAME: &'static str = "work";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        mount.skip(HEADER_HEIGHT);
        let mut shown = filter_works(self.items, self.filter);
        if let Some(limit) = self.limit {
            shown.truncate(limit);
        }
        let cells = mount.reveal_grid("card", shown.len(), COLUMNS, ROW_HEIGHT);
        html! {
            section.section.work id="work" {
                (heading("OUR WORK", "Stories we have told"))
                @if self.show_filters {
                    nav.filter-bar aria-label="Filter work by category" {
                        @for filter in work_filters(self.items) {
                            @let active = same_category(&filter, self.filter);
                            a.filter.active[active]
                                href=(site.link(&filter_path(&filter)))
                                aria-current=[active.then_some("page")] {
                                (filter)
                            }
                        }
                    }
                }
                @if shown.is_empty() {
                    (skeleton(COLUMNS, "New work is on its way."))
                } @else {
                    div.card-grid {
                        @for (item, attrs) in shown.iter().zip(&cells) {
                            (revealed(attrs, "card", card(item, site)))
                        }
                    }
                }
                @if self.limit.is_some_and(|l| self.items.len() > l) {
                    a.button.more href=(site.link("/work")) { "VIEW ALL WORK" }
                }
            }
        }
    }
}

/// A single project page.
pub struct WorkDetail<'a> {
    pub item: &'a WorkItem,
}

impl Section for WorkDetail<'_> {
    const NAME: &'static str = "work-detail";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let item = self.item;
        // Uncategorized items show the default label but have no category page.
        let category_filter = item.categories.first().map(String::as_str).unwrap_or(ALL_FILTER);
        mount.skip(HEADER_HEIGHT);
        let media = mount.reveal("media", ROW_HEIGHT * 1.5);
        let body = mount.reveal("body", ROW_HEIGHT);
        html! {
            article.section.work-detail {
                header.section-heading {
                    a.eyebrow href=(site.link(&filter_path(category_filter))) { (item.category()) }
                    h1 { (item.title) }
                    @if let Some(subtitle) = &item.subtitle {
                        p.subtitle { (subtitle) }
                    }
                }
                (revealed(&media, "detail-media", html! {
                    img src=(item.thumbnail) alt=(item.title);
                    @if let Some(video) = &item.video_url {
                        a.button.cta href=(video) target="_blank" rel="noopener" { "WATCH THE FILM" }
                    }
                }))
                (revealed(&body, "detail-body", render_blocks(&item.body)))
                a.back href=(site.link("/work")) { "← BACK TO WORK" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{render_section, sample_works};

    #[test]
    fn empty_collection_renders_skeleton() {
        let html = render_section(&WorkGrid::all(&[]));
        assert!(html.contains("skeleton"));
        assert!(html.contains("New work is on its way."));
    }

    #[test]
    fn filter_keeps_fetched_order() {
        let works = sample_works();
        let html = render_section(&WorkGrid {
            filter: "film",
            ..WorkGrid::all(&works)
        });
        let dankira = html.find("DANKIRA").unwrap();
        let habesha = html.find("HABESHA").unwrap();
        assert!(dankira < habesha);
        assert!(!html.contains("<h3>KOBA</h3>"));
    }

    #[test]
    fn filter_bar_links_to_category_pages() {
        let works = sample_works();
        let html = render_section(&WorkGrid::all(&works));
        assert!(html.contains(r#"href="/work/category/film/""#));
        assert!(html.contains(r#"href="/work/""#));
        assert!(html.contains(r#"class="filter active""#));
    }

    #[test]
    fn non_ascii_category_page_keeps_its_items() {
        let mut works = sample_works();
        works[0].categories = vec!["Café Films".to_string()];
        let html = render_section(&WorkGrid {
            filter: "CAFÉ FILMS",
            ..WorkGrid::all(&works)
        });
        assert!(html.contains("DANKIRA"));
        assert!(!html.contains("skeleton"));
        assert!(html.contains(r#"href="/work/category/café-films/""#));
        assert!(html.contains(r#"class="filter active""#));
    }

    #[test]
    fn uncategorized_detail_links_to_full_listing() {
        let mut works = sample_works();
        works[0].categories.clear();
        let html = render_section(&WorkDetail { item: &works[0] });
        assert!(html.contains("Production"));
        assert!(!html.contains("/work/category/"));
    }

    #[test]
    fn cards_stagger_in_order() {
        let works = sample_works();
        let html = render_section(&WorkGrid::all(&works));
        assert!(html.contains("--reveal-delay: 0ms"));
        assert!(html.contains("--reveal-delay: 100ms"));
        assert!(html.contains("--reveal-delay: 200ms"));
    }

    #[test]
    fn card_links_to_detail_then_video() {
        let works = sample_works();
        assert_eq!(card_target(&works[0]).as_deref(), Some("/work/dankira"));
        let mut unslugged = works[0].clone();
        unslugged.slug = None;
        unslugged.video_url = Some("https://vimeo.com/1".to_string());
        assert_eq!(card_target(&unslugged).as_deref(), Some("https://vimeo.com/1"));
    }

    #[test]
    fn limit_adds_view_all_link() {
        let works = sample_works();
        let html = render_section(&WorkGrid {
            limit: Some(1),
            show_filters: false,
            ..WorkGrid::all(&works)
        });
        assert!(html.contains("VIEW ALL WORK"));
        assert!(!html.contains("filter-bar"));
    }

    #[test]
    fn detail_page_links_back_and_to_category() {
        let works = sample_works();
        let html = render_section(&WorkDetail { item: &works[0] });
        assert!(html.contains("<h1>DANKIRA</h1>"));
        assert!(html.contains(r#"href="/work/category/film/""#));
        assert!(html.contains("BACK TO WORK"));
        assert!(html.contains("About DANKIRA."));
    }

    #[test]
    fn filter_paths() {
        assert_eq!(filter_path("ALL"), "/work");
        assert_eq!(filter_path("MUSIC VIDEO"), "/work/category/music-video");
    }
}
