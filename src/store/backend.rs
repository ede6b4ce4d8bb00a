//! Content store trait and shared error type.

use super::query::Query;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Malformed store response: {0}")]
    Malformed(String),
    #[error("Store unavailable: {0}")]
    Offline(String),
}

/// A read-only source of content documents.
///
/// Implementations must be `Send + Sync`: one store instance is shared by
/// every concurrent section fetch.
pub trait ContentStore: Send + Sync {
    /// Run `query` and return the matching raw documents.
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    fn query(&self, query: &Query) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// A store that could not be opened. Every query fails with the original
/// reason, so the build degrades section by section instead of aborting.
#[derive(Debug, Clone)]
pub struct OfflineStore {
    reason: String,
}

impl OfflineStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ContentStore for OfflineStore {
    fn query(&self, _query: &Query) -> Result<Vec<serde_json::Value>, StoreError> {
        Err(StoreError::Offline(self.reason.clone()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::types::DocumentKind;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory store that evaluates queries like the export store and
    /// records every query it receives. Uses Mutex so it is Sync and works
    /// with rayon.
    #[derive(Default)]
    pub struct MockStore {
        pub documents: Vec<Value>,
        pub failing: Vec<DocumentKind>,
        pub delay: Option<(DocumentKind, Duration)>,
        pub queries: Mutex<Vec<String>>,
    }

    impl MockStore {
        pub fn with_documents(documents: Vec<Value>) -> Self {
            Self {
                documents,
                ..Self::default()
            }
        }

        pub fn failing(mut self, kind: DocumentKind) -> Self {
            self.failing.push(kind);
            self
        }

        pub fn slow(mut self, kind: DocumentKind, delay: Duration) -> Self {
            self.delay = Some((kind, delay));
            self
        }

        pub fn recorded(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl ContentStore for MockStore {
        fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
            self.queries.lock().unwrap().push(query.groq());
            if let Some((kind, delay)) = self.delay
                && kind == query.kind
            {
                std::thread::sleep(delay);
            }
            if self.failing.contains(&query.kind) {
                return Err(StoreError::Status {
                    status: 503,
                    message: "backend unavailable".to_string(),
                });
            }
            Ok(query.evaluate(&self.documents))
        }
    }

    #[test]
    fn offline_store_always_fails() {
        let store = OfflineStore::new("no network");
        let err = store
            .query(&Query::collection(DocumentKind::Work))
            .unwrap_err();
        assert!(err.to_string().contains("no network"));
    }
}
