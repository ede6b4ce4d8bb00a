//! Content resolution: store documents → ordered [`ContentDocument`]s.
//!
//! The [`Resolver`] is the only thing sections talk to. It owns the shared
//! store handle and the image resolver, and implements the three content
//! operations:
//!
//! | Operation | Failure mode |
//! |---|---|
//! | [`Resolver::fetch_collection`] | `ContentError::Unavailable` (callers substitute `[]`) |
//! | [`Resolver::fetch_by_slug`] | `SlugLookup::NotFound` value; store failure is `Unavailable` |
//! | [`Resolver::resolve_image`] | never fails; placeholder URL |
//!
//! ## Parsing
//!
//! Raw documents are JSON objects. System fields (`_id`, `_type`,
//! `_createdAt`, ...) become document metadata, `slug` becomes the slug, and
//! `order` the order hint. Every other field is typed by shape:
//!
//! ```text
//! "text"                                  → Text
//! 42                                      → Number
//! { "_type": "image", "asset": {...} }    → Image
//! [ { "_type": "block", ... }, ... ]      → RichText
//! [ "a", "b" ]                            → List of { value: Text }
//! [ {...}, ... ] or {...}                 → List of nested documents
//! ```
//!
//! A document that cannot be parsed (no `_id`, unknown `_type`) is skipped
//! with a warning; the rest of its collection still renders.

use crate::image::{ImageParams, ImageResolver};
use crate::store::{ContentStore, Query, StoreError, query::raw_slug};
use crate::types::{Block, ContentDocument, DocumentKind, FieldValue, ImageRef, Ordering, Span};
use serde_json::{Map, Value};
use std::cmp;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content unavailable for {kind}: {source}")]
    Unavailable {
        kind: DocumentKind,
        #[source]
        source: StoreError,
    },
}

/// Result of a slug lookup. `NotFound` is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SlugLookup {
    Found(ContentDocument),
    NotFound,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("document has no _id")]
    MissingId,
    #[error("document {0} has no _type")]
    MissingType(String),
    #[error("document {0} has unrecognized type {1:?}")]
    UnknownType(String, String),
}

/// Shared, read-only access to the content store.
pub struct Resolver {
    store: Arc<dyn ContentStore>,
    images: ImageResolver,
}

impl Resolver {
    pub fn new(store: Arc<dyn ContentStore>, images: ImageResolver) -> Self {
        Self { store, images }
    }

    pub fn images(&self) -> &ImageResolver {
        &self.images
    }

    /// Fetch every published document of `kind`, ordered by the kind's policy.
    pub fn fetch_collection(&self, kind: DocumentKind) -> Result<Vec<ContentDocument>, ContentError> {
        let raw = self
            .store
            .query(&Query::collection(kind))
            .map_err(|source| ContentError::Unavailable { kind, source })?;
        let mut docs = parse_documents(&raw);
        docs.retain(|d| d.kind == kind);
        sort_documents(kind.ordering(), &mut docs);
        debug!(%kind, count = docs.len(), "collection fetched");
        Ok(docs)
    }

    /// [`fetch_collection`](Self::fetch_collection) for a section boundary:
    /// failures are logged and become an empty collection.
    pub fn fetch_collection_or_empty(&self, kind: DocumentKind) -> Vec<ContentDocument> {
        self.fetch_collection(kind).unwrap_or_else(|e| {
            warn!("{e}; rendering empty section");
            Vec::new()
        })
    }

    /// Exact, case-sensitive slug lookup.
    pub fn fetch_by_slug(&self, kind: DocumentKind, slug: &str) -> Result<SlugLookup, ContentError> {
        let raw = self
            .store
            .query(&Query::by_slug(kind, slug))
            .map_err(|source| ContentError::Unavailable { kind, source })?;
        let found = parse_documents(&raw)
            .into_iter()
            .find(|d| d.kind == kind && d.slug.as_deref() == Some(slug));
        Ok(match found {
            Some(doc) => SlugLookup::Found(doc),
            None => SlugLookup::NotFound,
        })
    }

    pub fn resolve_image(&self, reference: &ImageRef, params: ImageParams) -> String {
        self.images.resolve(reference, params)
    }
}

/// Parse raw documents, skipping (and logging) the ones that don't parse.
pub fn parse_documents(raw: &[Value]) -> Vec<ContentDocument> {
    raw.iter()
        .filter_map(|v| match parse_document(v) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("skipping document: {e}");
                None
            }
        })
        .collect()
}

pub fn parse_document(raw: &Value) -> Result<ContentDocument, ParseError> {
    let id = raw
        .get("_id")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingId)?
        .to_string();
    let type_name = raw
        .get("_type")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingType(id.clone()))?;
    let kind = DocumentKind::from_type_name(type_name)
        .ok_or_else(|| ParseError::UnknownType(id.clone(), type_name.to_string()))?;

    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    Ok(ContentDocument {
        kind,
        slug: raw_slug(raw).map(str::to_string),
        fields: parse_fields(obj, kind),
        order_hint: raw.get("order").and_then(as_order_hint),
        created_at: string_field(raw, "_createdAt"),
        published_at: string_field(raw, "publishedAt"),
        id,
    })
}

fn string_field(raw: &Value, name: &str) -> Option<String> {
    raw.get(name).and_then(Value::as_str).map(str::to_string)
}

fn as_order_hint(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
}

/// Reserved keys that are document metadata rather than fields.
fn is_metadata(key: &str) -> bool {
    key.starts_with('_') || key == "slug" || key == "publishedAt"
}

fn parse_fields(obj: &Map<String, Value>, kind: DocumentKind) -> Vec<(String, FieldValue)> {
    obj.iter()
        .filter(|(k, _)| !is_metadata(k))
        .filter_map(|(k, v)| parse_field(v, kind).map(|f| (k.clone(), f)))
        .collect()
}

fn parse_field(value: &Value, kind: DocumentKind) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::Object(obj) => {
            if let Some(reference) = image_reference(obj) {
                return Some(FieldValue::Image(reference));
            }
            if obj.get("_type").and_then(Value::as_str) == Some("slug") {
                return obj
                    .get("current")
                    .and_then(Value::as_str)
                    .map(|s| FieldValue::Text(s.to_string()));
            }
            Some(FieldValue::List(vec![nested_document(obj, kind)]))
        }
        Value::Array(items) => Some(parse_array(items, kind)),
        Value::Bool(_) | Value::Null => None,
    }
}

/// `{ "_type": "image", "asset": { "_ref": "image-..." } }`; expanded assets
/// carry `url` instead of `_ref`.
fn image_reference(obj: &Map<String, Value>) -> Option<ImageRef> {
    let asset = obj.get("asset")?.as_object()?;
    asset
        .get("_ref")
        .or_else(|| asset.get("url"))
        .and_then(Value::as_str)
        .map(|s| ImageRef(s.to_string()))
}

fn is_block(v: &Value) -> bool {
    v.get("_type").and_then(Value::as_str) == Some("block")
}

fn parse_array(items: &[Value], kind: DocumentKind) -> FieldValue {
    if items.iter().any(is_block) {
        return FieldValue::RichText(items.iter().filter(|v| is_block(v)).map(parse_block).collect());
    }
    let nested = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(ContentDocument {
                kind,
                id: String::new(),
                slug: None,
                fields: vec![("value".to_string(), FieldValue::Text(s.clone()))],
                order_hint: None,
                created_at: None,
                published_at: None,
            }),
            Value::Object(obj) => Some(nested_document(obj, kind)),
            _ => None,
        })
        .collect();
    FieldValue::List(nested)
}

fn nested_document(obj: &Map<String, Value>, kind: DocumentKind) -> ContentDocument {
    let raw = Value::Object(obj.clone());
    ContentDocument {
        kind,
        id: obj
            .get("_key")
            .or_else(|| obj.get("_id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        slug: raw_slug(&raw).map(str::to_string),
        fields: parse_fields(obj, kind),
        order_hint: obj.get("order").and_then(as_order_hint),
        created_at: None,
        published_at: None,
    }
}

fn parse_block(v: &Value) -> Block {
    let style = v
        .get("style")
        .and_then(Value::as_str)
        .unwrap_or("normal")
        .to_string();
    let spans = v
        .get("children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|c| {
                    let text = c.get("text")?.as_str()?.to_string();
                    let marks = c
                        .get("marks")
                        .and_then(Value::as_array)
                        .map(|m| m.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default();
                    Some(Span { text, marks })
                })
                .collect()
        })
        .unwrap_or_default();
    Block { style, spans }
}

/// Sort a collection in place. Documents carrying an order hint come first,
/// ascending; `ordering` decides among equal hints and among the unhinted
/// rest. The sort is stable, so documents that still compare equal keep the
/// store's order.
pub fn sort_documents(ordering: Ordering, docs: &mut [ContentDocument]) {
    docs.sort_by(|a, b| match (a.order_hint, b.order_hint) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| policy_order(ordering, a, b)),
        (Some(_), None) => cmp::Ordering::Less,
        (None, Some(_)) => cmp::Ordering::Greater,
        (None, None) => policy_order(ordering, a, b),
    });
}

fn policy_order(ordering: Ordering, a: &ContentDocument, b: &ContentDocument) -> cmp::Ordering {
    match ordering {
        Ordering::Manual => cmp::Ordering::Equal,
        Ordering::Recency => {
            let key = |d: &ContentDocument| d.published_at.clone().or_else(|| d.created_at.clone());
            key(b).cmp(&key(a))
        }
        Ordering::Natural => b.created_at.cmp(&a.created_at),
    }
}
