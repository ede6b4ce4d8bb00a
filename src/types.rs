//! Shared content types.
//!
//! These types are the common currency between the store, the resolver and
//! the normalizers. A [`ContentDocument`] is what one store document looks
//! like after parsing, before it is turned into a per-kind record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of document types this site reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Work,
    Service,
    Testimonial,
    BlogPost,
    NavigationHeader,
    ClientLogo,
    Hero,
    TeamMember,
}

/// How a collection of one kind is ordered for display when `order` hints
/// don't decide. Hinted documents always come first, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Store order.
    Manual,
    /// Newest `publishedAt` first, falling back to `_createdAt`.
    Recency,
    /// Newest `_createdAt` first.
    Natural,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        DocumentKind::Work,
        DocumentKind::Service,
        DocumentKind::Testimonial,
        DocumentKind::BlogPost,
        DocumentKind::NavigationHeader,
        DocumentKind::ClientLogo,
        DocumentKind::Hero,
        DocumentKind::TeamMember,
    ];

    /// The `_type` name used by the content store.
    pub fn type_name(self) -> &'static str {
        match self {
            DocumentKind::Work => "work",
            DocumentKind::Service => "service",
            DocumentKind::Testimonial => "quote",
            DocumentKind::BlogPost => "blog",
            DocumentKind::NavigationHeader => "header",
            DocumentKind::ClientLogo => "clientLogo",
            DocumentKind::Hero => "heroSection",
            DocumentKind::TeamMember => "teamMember",
        }
    }

    /// Inverse of [`type_name`](Self::type_name). Unrecognized types are `None`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    pub fn ordering(self) -> Ordering {
        match self {
            DocumentKind::Work
            | DocumentKind::Service
            | DocumentKind::ClientLogo
            | DocumentKind::TeamMember => Ordering::Manual,
            DocumentKind::BlogPost => Ordering::Recency,
            DocumentKind::Testimonial | DocumentKind::NavigationHeader | DocumentKind::Hero => {
                Ordering::Natural
            }
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// An opaque image reference token as stored in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

/// One inline run of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

/// A rich-text block: a paragraph-level style and its spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// `normal`, `h2`, `h3`, `blockquote`, ...
    pub style: String,
    pub spans: Vec<Span>,
}

impl Block {
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A field value after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    RichText(Vec<Block>),
    Image(ImageRef),
    List(Vec<ContentDocument>),
    Number(f64),
}

/// A document fetched from the content store.
///
/// Read-only: created and edited in the store, fetched per build.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    pub kind: DocumentKind,
    pub id: String,
    pub slug: Option<String>,
    /// Field name → value, in document order.
    pub fields: Vec<(String, FieldValue)>,
    pub order_hint: Option<i64>,
    pub created_at: Option<String>,
    pub published_at: Option<String>,
}

impl ContentDocument {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Text field, treating blank strings as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn image(&self, name: &str) -> Option<&ImageRef> {
        match self.field(name) {
            Some(FieldValue::Image(r)) => Some(r),
            _ => None,
        }
    }

    pub fn rich_text(&self, name: &str) -> Option<&[Block]> {
        match self.field(name) {
            Some(FieldValue::RichText(blocks)) => Some(blocks),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.field(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Plain strings from a list field (e.g. the header menu).
    pub fn strings(&self, name: &str) -> Vec<String> {
        match self.field(name) {
            Some(FieldValue::List(items)) => items
                .iter()
                .filter_map(|d| d.text("value").map(str::to_string))
                .collect(),
            Some(FieldValue::Text(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_type_name(kind.type_name()), Some(kind));
        }
    }

    #[test]
    fn unknown_type_name_is_none() {
        assert_eq!(DocumentKind::from_type_name("sanity.imageAsset"), None);
    }

    #[test]
    fn ordering_policy_per_kind() {
        assert_eq!(DocumentKind::Service.ordering(), Ordering::Manual);
        assert_eq!(DocumentKind::BlogPost.ordering(), Ordering::Recency);
        assert_eq!(DocumentKind::Testimonial.ordering(), Ordering::Natural);
    }

    #[test]
    fn blank_text_is_absent() {
        let doc = ContentDocument {
            kind: DocumentKind::Service,
            id: "s1".to_string(),
            slug: None,
            fields: vec![("title".to_string(), FieldValue::Text("   ".to_string()))],
            order_hint: None,
            created_at: None,
            published_at: None,
        };
        assert_eq!(doc.text("title"), None);
    }

    #[test]
    fn block_plain_text_joins_spans() {
        let block = Block {
            style: "normal".to_string(),
            spans: vec![
                Span {
                    text: "Bold ".to_string(),
                    marks: vec!["strong".to_string()],
                },
                Span {
                    text: "ideas".to_string(),
                    marks: vec![],
                },
            ],
        };
        assert_eq!(block.plain_text(), "Bold ideas");
    }
}
