//! Display-ready records, one per document kind.
//!
//! Normalization is the only place where missing fields are filled in. Every
//! fallback lives in [`defaults`], so renderers never guess: they receive a
//! record whose required fields are always present and whose optional fields
//! are explicitly `Option`. Image references are resolved to URLs here too.

use crate::image::{ImageResolver, Preset};
use crate::types::{Block, ContentDocument, FieldValue};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Values used when a document leaves a field empty.
pub mod defaults {
    pub const WORK_TITLE: &str = "Untitled project";
    pub const WORK_CATEGORY: &str = "Production";
    pub const SERVICE_TITLE: &str = "Service";
    pub const TESTIMONIAL_AUTHOR: &str = "Anonymous";
    pub const BLOG_TITLE: &str = "Untitled post";
    pub const CLIENT_NAME: &str = "Client";
    pub const TEAM_NAME: &str = "Team member";
    pub const HEADER_LOGO: &str = "/assets/logo.svg";
    pub const HEADER_MENU: [&str; 5] = ["HOME", "WORK", "SERVICES", "ABOUT US", "BLOGS"];
    pub const HEADER_CTA: &str = "CONTACT US";
    pub const HERO_TITLE: &str = "WE TELL STORIES WITH SOUL";
    pub const HERO_SUBTITLE: &str =
        "Film, photography and design for brands that want to be remembered.";
    pub const HERO_CTA_TEXT: &str = "Get Started";
    pub const HERO_CTA_LINK: &str = "/contact";
}

/// The "show everything" work filter.
pub const ALL_FILTER: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub slug: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    /// At least one entry; the first is the primary category.
    pub categories: Vec<String>,
    pub thumbnail: String,
    pub video_url: Option<String>,
    #[serde(default)]
    pub body: Vec<Block>,
}

impl WorkItem {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        let mut categories = list_titles(doc, "categories");
        if categories.is_empty() {
            categories = doc.text("category").map(str::to_string).into_iter().collect();
        }
        if categories.is_empty() {
            categories.push(defaults::WORK_CATEGORY.to_string());
        }
        Self {
            id: doc.id.clone(),
            slug: doc.slug.clone(),
            title: text_or(doc, "title", defaults::WORK_TITLE),
            subtitle: optional_text(doc, "subtitle"),
            categories,
            thumbnail: image_field(doc, images, &["thumbnail", "mainImage", "thumbnailUrl"], Preset::Card),
            video_url: optional_text(doc, "videoUrl"),
            body: rich_text(doc, &["body", "content", "description"]),
        }
    }

    pub fn category(&self) -> &str {
        self.categories.first().map(String::as_str).unwrap_or(defaults::WORK_CATEGORY)
    }

    /// Case-insensitive category match; [`ALL_FILTER`] matches everything.
    pub fn matches(&self, filter: &str) -> bool {
        same_category(filter, ALL_FILTER) || self.categories.iter().any(|c| same_category(c, filter))
    }
}

/// Case folding shared by filter labels, category matching and category
/// slugs. Upper-casing first makes `ß` and `SS` fold alike.
fn fold_case(s: &str) -> String {
    s.to_uppercase().to_lowercase()
}

/// Whether two category names (or filter labels) denote the same category.
pub fn same_category(a: &str, b: &str) -> bool {
    fold_case(a) == fold_case(b)
}

/// Project `items` onto those matching `filter`, keeping their order.
pub fn filter_works<'a>(items: &'a [WorkItem], filter: &str) -> Vec<&'a WorkItem> {
    items.iter().filter(|w| w.matches(filter)).collect()
}

/// Filter bar entries: [`ALL_FILTER`] then each category once, upper-cased,
/// in order of first appearance.
pub fn work_filters(items: &[WorkItem]) -> Vec<String> {
    let mut filters = vec![ALL_FILTER.to_string()];
    for category in items.iter().flat_map(|w| &w.categories) {
        let upper = category.to_uppercase();
        if !filters.contains(&upper) {
            filters.push(upper);
        }
    }
    filters
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Service {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        Self {
            id: doc.id.clone(),
            title: text_or(doc, "title", defaults::SERVICE_TITLE),
            description: optional_text(doc, "description").or_else(|| plain_text(doc, "description")),
            image: optional_image(doc, images, &["image", "imageUrl"], Preset::Card),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
}

impl Testimonial {
    /// A testimonial without quote text has nothing to show.
    pub fn from_document(doc: &ContentDocument) -> Option<Self> {
        let quote = optional_text(doc, "quote").or_else(|| plain_text(doc, "quote"))?;
        Some(Self {
            id: doc.id.clone(),
            quote,
            author: text_or(doc, "author", defaults::TESTIMONIAL_AUTHOR),
            role: optional_text(doc, "role"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub slug: Option<String>,
    pub title: String,
    pub excerpt: Option<String>,
    pub image: String,
    pub category: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub body: Vec<Block>,
}

impl BlogPost {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        let body = rich_text(doc, &["body", "content"]);
        let excerpt = optional_text(doc, "excerpt").or_else(|| {
            body.iter()
                .find(|b| b.style == "normal")
                .map(|b| truncate_words(&b.plain_text(), 28))
                .filter(|s| !s.is_empty())
        });
        Self {
            id: doc.id.clone(),
            slug: doc.slug.clone(),
            title: text_or(doc, "title", defaults::BLOG_TITLE),
            excerpt,
            image: image_field(doc, images, &["mainImage", "image", "imageUrl"], Preset::Card),
            category: optional_text(doc, "category")
                .or_else(|| list_titles(doc, "categories").into_iter().next()),
            published_at: doc.published_at.clone().or_else(|| doc.created_at.clone()),
            body,
        }
    }

    /// `2025-03-14T09:00:00Z` → `2025-03-14`.
    pub fn date(&self) -> Option<&str> {
        self.published_at.as_deref().map(|d| d.get(..10).unwrap_or(d))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientLogo {
    pub id: String,
    pub name: String,
    pub logo: String,
}

impl ClientLogo {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        Self {
            id: doc.id.clone(),
            name: text_or(doc, "name", defaults::CLIENT_NAME),
            logo: image_field(doc, images, &["logo", "logoUrl"], Preset::Logo),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLink {
    pub label: String,
    pub href: String,
}

impl MenuLink {
    pub fn from_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            href: menu_href(label),
        }
    }
}

/// Site-relative target for a menu label.
pub fn menu_href(label: &str) -> String {
    let key = label.trim().to_lowercase();
    match key.as_str() {
        "home" => "/".to_string(),
        "work" | "works" | "our work" => "/work".to_string(),
        "services" | "service" => "/services".to_string(),
        "about" | "about us" => "/about".to_string(),
        "blog" | "blogs" => "/blog".to_string(),
        k if k.starts_with("contact") => "/contact".to_string(),
        k => format!("/{}", slugify(k)),
    }
}

/// Lower-case alphanumerics joined by dashes: `"Music Video"` →
/// `music-video`, `"Café Films"` → `café-films`. Non-ASCII letters are kept.
pub fn slugify(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// URL segment of a work category page. Equal categories (in any case) get
/// the same segment. When slugifying would drop characters, a short hash of
/// the category is appended so distinct categories never share a page:
///
/// ```text
/// "Music Video"  → music-video
/// "ፊልም"          → ፊልም
/// "Film & TV"    → film-tv-<hash>
/// "!!!"          → <hash>
/// ```
pub fn category_slug(category: &str) -> String {
    let folded = fold_case(category);
    let base = slugify(&folded);
    if base.replace('-', " ") == folded {
        return base;
    }
    let digest = Sha256::digest(folded.as_bytes());
    let hash = format!("{digest:x}");
    if base.is_empty() {
        hash[..8].to_string()
    } else {
        format!("{base}-{}", &hash[..8])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteHeader {
    pub logo: String,
    pub menu: Vec<MenuLink>,
    pub cta: MenuLink,
}

impl Default for SiteHeader {
    fn default() -> Self {
        Self {
            logo: defaults::HEADER_LOGO.to_string(),
            menu: defaults::HEADER_MENU.iter().map(|l| MenuLink::from_label(l)).collect(),
            cta: MenuLink {
                label: defaults::HEADER_CTA.to_string(),
                href: "/contact".to_string(),
            },
        }
    }
}

impl SiteHeader {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        let fallback = Self::default();
        let menu: Vec<MenuLink> = doc
            .strings("menu")
            .iter()
            .map(|l| MenuLink::from_label(l))
            .collect();
        let logo = match doc.field("logo") {
            Some(FieldValue::Image(r)) => images.preset(Some(r), Preset::Logo),
            Some(FieldValue::Text(t)) if !t.trim().is_empty() => t.clone(),
            _ => fallback.logo,
        };
        let cta_label = doc
            .text("cta")
            .map(str::to_string)
            .or_else(|| nested_text(doc, "cta", "text"));
        let cta_href = nested_text(doc, "cta", "link");
        Self {
            logo,
            menu: if menu.is_empty() { fallback.menu } else { menu },
            cta: MenuLink {
                href: cta_href.unwrap_or(fallback.cta.href),
                label: cta_label.unwrap_or(fallback.cta.label),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background: Option<String>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title: defaults::HERO_TITLE.to_string(),
            subtitle: defaults::HERO_SUBTITLE.to_string(),
            cta_text: defaults::HERO_CTA_TEXT.to_string(),
            cta_link: defaults::HERO_CTA_LINK.to_string(),
            background: None,
        }
    }
}

impl Hero {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        Self {
            title: text_or(doc, "title", defaults::HERO_TITLE),
            subtitle: text_or(doc, "subtitle", defaults::HERO_SUBTITLE),
            cta_text: text_or(doc, "ctaText", defaults::HERO_CTA_TEXT),
            cta_link: text_or(doc, "ctaLink", defaults::HERO_CTA_LINK),
            background: optional_image(doc, images, &["backgroundImage"], Preset::Hero),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub photo: String,
}

impl TeamMember {
    pub fn from_document(doc: &ContentDocument, images: &ImageResolver) -> Self {
        Self {
            id: doc.id.clone(),
            name: text_or(doc, "name", defaults::TEAM_NAME),
            role: optional_text(doc, "role"),
            photo: image_field(doc, images, &["image", "photo", "imageUrl"], Preset::Portrait),
        }
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn text_or(doc: &ContentDocument, name: &str, default: &str) -> String {
    doc.text(name).unwrap_or(default).trim().to_string()
}

fn optional_text(doc: &ContentDocument, name: &str) -> Option<String> {
    doc.text(name).map(|s| s.trim().to_string())
}

fn plain_text(doc: &ContentDocument, name: &str) -> Option<String> {
    let text = doc
        .rich_text(name)?
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n");
    (!text.trim().is_empty()).then_some(text)
}

fn rich_text(doc: &ContentDocument, names: &[&str]) -> Vec<Block> {
    names
        .iter()
        .find_map(|n| doc.rich_text(n))
        .map(<[Block]>::to_vec)
        .unwrap_or_default()
}

/// `field.<inner>` when the field is a nested object.
fn nested_text(doc: &ContentDocument, name: &str, inner: &str) -> Option<String> {
    match doc.field(name) {
        Some(FieldValue::List(items)) => items.first()?.text(inner).map(str::to_string),
        _ => None,
    }
}

/// Titles of a list of references (`[{title}]`) or plain strings.
fn list_titles(doc: &ContentDocument, name: &str) -> Vec<String> {
    match doc.field(name) {
        Some(FieldValue::List(items)) => items
            .iter()
            .filter_map(|d| d.text("title").or_else(|| d.text("value")))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// The first present image field, as an image reference or a plain URL.
fn optional_image(
    doc: &ContentDocument,
    images: &ImageResolver,
    names: &[&str],
    preset: Preset,
) -> Option<String> {
    names.iter().find_map(|n| match doc.field(n) {
        Some(FieldValue::Image(r)) => Some(images.preset(Some(r), preset)),
        Some(FieldValue::Text(t)) if !t.trim().is_empty() => {
            Some(images.preset(Some(&crate::types::ImageRef(t.clone())), preset))
        }
        _ => None,
    })
}

fn image_field(doc: &ContentDocument, images: &ImageResolver, names: &[&str], preset: Preset) -> String {
    optional_image(doc, images, names, preset).unwrap_or_else(|| images.placeholder().to_string())
}

fn truncate_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        words.join(" ")
    } else {
        format!("{}…", words[..max].join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImagesConfig, StoreConfig};
    use crate::resolver::parse_document;
    use serde_json::json;

    fn images() -> ImageResolver {
        ImageResolver::new(&StoreConfig::default(), &ImagesConfig::default())
    }

    fn doc(value: serde_json::Value) -> ContentDocument {
        parse_document(&value).unwrap()
    }

    fn work(id: &str, categories: &[&str]) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            slug: None,
            title: id.to_string(),
            subtitle: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            thumbnail: "/t.jpg".to_string(),
            video_url: None,
            body: vec![],
        }
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn empty_header_uses_default_menu_and_cta() {
        let header = SiteHeader::from_document(&doc(json!({"_id": "h", "_type": "header"})), &images());
        let labels: Vec<&str> = header.menu.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, defaults::HEADER_MENU);
        assert_eq!(header.cta.label, "CONTACT US");
        assert_eq!(header.cta.href, "/contact");
    }

    #[test]
    fn header_cta_object_overrides_defaults() {
        let header = SiteHeader::from_document(
            &doc(json!({
                "_id": "h", "_type": "header",
                "menu": ["HOME", "Careers"],
                "cta": {"text": "TALK TO US", "link": "/contact"}
            })),
            &images(),
        );
        assert_eq!(header.menu[1].href, "/careers");
        assert_eq!(header.cta.label, "TALK TO US");
    }

    #[test]
    fn hero_defaults_cta_text() {
        let hero = Hero::from_document(
            &doc(json!({"_id": "x", "_type": "heroSection", "title": "Stories"})),
            &images(),
        );
        assert_eq!(hero.title, "Stories");
        assert_eq!(hero.cta_text, "Get Started");
        assert!(hero.background.is_none());
    }

    #[test]
    fn work_without_image_gets_placeholder() {
        let item = WorkItem::from_document(&doc(json!({"_id": "w", "_type": "work"})), &images());
        assert_eq!(item.thumbnail, "/assets/placeholder.svg");
        assert_eq!(item.title, defaults::WORK_TITLE);
        assert_eq!(item.category(), defaults::WORK_CATEGORY);
    }

    #[test]
    fn work_resolves_thumbnail_reference() {
        let item = WorkItem::from_document(
            &doc(json!({
                "_id": "w", "_type": "work", "category": "Film",
                "thumbnail": {"_type": "image", "asset": {"_ref": "image-abc123-1920x1080-jpg"}}
            })),
            &images(),
        );
        assert!(item.thumbnail.starts_with("https://cdn.sanity.io/images/"));
        assert_eq!(item.categories, vec!["Film"]);
    }

    #[test]
    fn work_reads_category_references() {
        let item = WorkItem::from_document(
            &doc(json!({
                "_id": "w", "_type": "work",
                "categories": [{"title": "Photography"}, {"title": "Design"}]
            })),
            &images(),
        );
        assert_eq!(item.categories, vec!["Photography", "Design"]);
    }

    #[test]
    fn testimonial_without_quote_is_dropped() {
        assert!(Testimonial::from_document(&doc(json!({"_id": "q", "_type": "quote"}))).is_none());
        let t = Testimonial::from_document(&doc(json!({
            "_id": "q", "_type": "quote", "quote": "Great crew."
        })))
        .unwrap();
        assert_eq!(t.author, "Anonymous");
    }

    #[test]
    fn blog_excerpt_falls_back_to_first_paragraph() {
        let post = BlogPost::from_document(
            &doc(json!({
                "_id": "b", "_type": "blog", "publishedAt": "2025-03-14T09:00:00Z",
                "body": [
                    {"_type": "block", "style": "h2", "children": [{"text": "Heading"}]},
                    {"_type": "block", "style": "normal", "children": [{"text": "First paragraph."}]}
                ]
            })),
            &images(),
        );
        assert_eq!(post.excerpt.as_deref(), Some("First paragraph."));
        assert_eq!(post.date(), Some("2025-03-14"));
    }

    #[test]
    fn slugify_joins_words() {
        assert_eq!(slugify("Music Video"), "music-video");
        assert_eq!(slugify("  3D / Motion "), "3d-motion");
        assert_eq!(slugify("Café Films"), "café-films");
    }

    #[test]
    fn category_slugs_keep_unicode_and_ignore_case() {
        assert_eq!(category_slug("Music Video"), "music-video");
        assert_eq!(category_slug("MUSIC VIDEO"), "music-video");
        assert_eq!(category_slug("Café Films"), "café-films");
        assert_eq!(category_slug("CAFÉ FILMS"), "café-films");
        assert_eq!(category_slug("ፊልም"), "ፊልም");
    }

    #[test]
    fn colliding_category_slugs_are_disambiguated() {
        let plain = category_slug("Music Video");
        let dashed = category_slug("Music-Video");
        let symbol = category_slug("Music & Video");
        assert_ne!(plain, dashed);
        assert_ne!(plain, symbol);
        assert_ne!(dashed, symbol);
        assert!(dashed.starts_with("music-video-"));
        assert_eq!(dashed, category_slug("MUSIC-VIDEO"));
    }

    #[test]
    fn punctuation_only_category_still_gets_a_segment() {
        let slug = category_slug("!!!");
        assert_eq!(slug.len(), 8);
        assert_ne!(slug, category_slug("???"));
    }

    #[test]
    fn menu_hrefs() {
        assert_eq!(menu_href("HOME"), "/");
        assert_eq!(menu_href("ABOUT US"), "/about");
        assert_eq!(menu_href("BLOGS"), "/blog");
        assert_eq!(menu_href("Contact Us"), "/contact");
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    #[test]
    fn all_filter_keeps_everything_in_order() {
        let items = vec![work("a", &["Film"]), work("b", &["Photo"]), work("c", &["Film"])];
        let ids: Vec<&str> = filter_works(&items, "ALL").iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn category_filter_is_case_insensitive_projection() {
        let items = vec![work("a", &["Film"]), work("b", &["Photo"]), work("c", &["film"])];
        let ids: Vec<&str> = filter_works(&items, "FILM").iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn non_ascii_filter_matches_its_own_items() {
        let items = vec![work("a", &["Café Films"]), work("b", &["Photo"]), work("c", &["Straße"])];
        let filters = work_filters(&items);
        assert_eq!(filters, vec!["ALL", "CAFÉ FILMS", "PHOTO", "STRASSE"]);
        let cafe: Vec<&str> = filter_works(&items, &filters[1]).iter().map(|w| w.id.as_str()).collect();
        assert_eq!(cafe, vec!["a"]);
        let street: Vec<&str> = filter_works(&items, &filters[3]).iter().map(|w| w.id.as_str()).collect();
        assert_eq!(street, vec!["c"]);
    }

    #[test]
    fn filter_bar_lists_categories_once() {
        let items = vec![work("a", &["Film"]), work("b", &["Photo", "film"])];
        assert_eq!(work_filters(&items), vec!["ALL", "FILM", "PHOTO"]);
    }

    #[test]
    fn filter_on_empty_collection() {
        assert!(filter_works(&[], "FILM").is_empty());
        assert_eq!(work_filters(&[]), vec!["ALL"]);
    }
}
