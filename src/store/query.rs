//! Content queries.
//!
//! A [`Query`] names a document kind and optionally a slug. It renders to a
//! GROQ string for the HTTP API and can be evaluated in memory against raw
//! documents for the export store:
//!
//! ```text
//! Query::collection(Work)          *[_type == "work" && !(_id in path("drafts.**"))] | order(defined(order) desc, order asc)
//! Query::by_slug(BlogPost, "x")    *[_type == "blog" && !(_id in path("drafts.**")) && coalesce(slug.current, slug) == $slug][0...1]
//! ```
//!
//! Documents with an `order` hint always lead, ascending; the kind's
//! [`Ordering`] only breaks ties. Slugs are either `{ "current": "x" }` or a
//! plain string, in both the API and the in-memory evaluation.
//!
//! Drafts are always excluded: the site only ever shows published content.

use crate::types::{DocumentKind, Ordering};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: DocumentKind,
    pub slug: Option<String>,
}

impl Query {
    pub fn collection(kind: DocumentKind) -> Self {
        Self { kind, slug: None }
    }

    pub fn by_slug(kind: DocumentKind, slug: impl Into<String>) -> Self {
        Self {
            kind,
            slug: Some(slug.into()),
        }
    }

    /// The GROQ text of this query. Parameters are referenced as `$name`
    /// and supplied separately by [`params`](Self::params).
    pub fn groq(&self) -> String {
        let filter = format!(
            r#"_type == "{}" && !(_id in path("drafts.**"))"#,
            self.kind.type_name()
        );
        match self.slug {
            Some(_) => format!("*[{filter} && coalesce(slug.current, slug) == $slug][0...1]"),
            None => {
                let tiebreak = match self.kind.ordering() {
                    Ordering::Manual => "",
                    Ordering::Recency => ", coalesce(publishedAt, _createdAt) desc",
                    Ordering::Natural => ", _createdAt desc",
                };
                format!("*[{filter}] | order(defined(order) desc, order asc{tiebreak})")
            }
        }
    }

    /// Query-string parameters: `$name` → JSON-encoded value.
    pub fn params(&self) -> Vec<(String, String)> {
        match &self.slug {
            Some(slug) => vec![("$slug".to_string(), Value::String(slug.clone()).to_string())],
            None => Vec::new(),
        }
    }

    /// Stable text identifying this query and its parameters.
    pub fn cache_key(&self) -> String {
        let mut key = self.groq();
        for (name, value) in self.params() {
            key.push('\0');
            key.push_str(&name);
            key.push('=');
            key.push_str(&value);
        }
        key
    }

    /// Whether a raw document satisfies the filter part of this query.
    pub fn matches(&self, doc: &Value) -> bool {
        let type_ok = doc.get("_type").and_then(Value::as_str) == Some(self.kind.type_name());
        let published = doc
            .get("_id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.starts_with("drafts."));
        let slug_ok = match &self.slug {
            Some(slug) => raw_slug(doc) == Some(slug.as_str()),
            None => true,
        };
        type_ok && published && slug_ok
    }

    /// Evaluate against raw documents in memory. Ordering is left to the
    /// resolver; slug lookups return at most one document.
    pub fn evaluate(&self, documents: &[Value]) -> Vec<Value> {
        let matching = documents.iter().filter(|d| self.matches(d)).cloned();
        match self.slug {
            Some(_) => matching.take(1).collect(),
            None => matching.collect(),
        }
    }
}

/// Slug of a raw document: `{ "slug": { "current": "x" } }` or `{ "slug": "x" }`.
pub fn raw_slug(doc: &Value) -> Option<&str> {
    match doc.get("slug")? {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj.get("current").and_then(Value::as_str),
        _ => None,
    }
}
