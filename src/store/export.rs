//! Dataset export store.
//!
//! Reads an NDJSON export (one JSON document per line, the format produced by
//! `sanity dataset export`) and evaluates queries in memory. Lines that fail
//! to parse are skipped with a warning so one bad document cannot take the
//! whole site down.

use super::backend::{ContentStore, StoreError};
use super::query::Query;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ExportStore {
    documents: Vec<Value>,
}

impl ExportStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let documents = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str::<Value>(line) {
                Ok(doc @ Value::Object(_)) => Some(doc),
                Ok(_) => {
                    warn!("export line {}: not a document, skipped", n + 1);
                    None
                }
                Err(e) => {
                    warn!("export line {}: {e}, skipped", n + 1);
                    None
                }
            })
            .collect();
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContentStore for ExportStore {
    fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        Ok(query.evaluate(&self.documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentKind;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{"_id":"w1","_type":"work","title":"DANKIRA","order":2}
{"_id":"w2","_type":"work","title":"KOBA","order":1}
{"_id":"drafts.w3","_type":"work","title":"Draft"}

{"_id":"s1","_type":"service","title":"Film"}
"#;

    #[test]
    fn parses_one_document_per_line() {
        let store = ExportStore::parse(EXPORT);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn skips_malformed_lines() {
        let store = ExportStore::parse("{\"_id\":\"a\",\"_type\":\"work\"}\nnot json\n[1,2]\n");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn query_filters_kind_and_drafts() {
        let store = ExportStore::parse(EXPORT);
        let works = store.query(&Query::collection(DocumentKind::Work)).unwrap();
        assert_eq!(works.len(), 2);
    }

    #[test]
    fn empty_kind_is_empty_not_error() {
        let store = ExportStore::parse(EXPORT);
        let quotes = store
            .query(&Query::collection(DocumentKind::Testimonial))
            .unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = ExportStore::open(&tmp.path().join("missing.ndjson"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn open_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.ndjson");
        fs::write(&path, EXPORT).unwrap();
        let store = ExportStore::open(&path).unwrap();
        assert!(!store.is_empty());
    }
}
