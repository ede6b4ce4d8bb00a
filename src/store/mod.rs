//! Content store access: the read-only query boundary.
//!
//! | Store | Source |
//! |---|---|
//! | [`HttpStore`] | Sanity-compatible HTTP query API (blocking `reqwest`) |
//! | [`ExportStore`] | NDJSON dataset export, evaluated in memory |
//! | [`OfflineStore`] | Stand-in when no store could be opened; every query fails |
//!
//! The module is split into:
//! - **Backend**: [`ContentStore`] trait + [`StoreError`]
//! - **Query**: [`Query`], kind + optional slug, rendered to GROQ
//! - **Implementations**: one file per store
//!
//! Stores return raw JSON documents. Parsing, ordering and normalization
//! happen in [`crate::resolver`], so every store gets identical semantics.

pub mod backend;
pub mod export;
pub mod http;
pub mod query;

pub use backend::{ContentStore, OfflineStore, StoreError};
pub use export::ExportStore;
pub use http::HttpStore;
pub use query::Query;

use crate::config::StoreConfig;
use std::path::Path;
use std::sync::Arc;

/// Open the store described by `config`, relative to `base_dir`.
///
/// An export file wins over the HTTP API when both are configured.
pub fn open(config: &StoreConfig, base_dir: &Path) -> Result<Arc<dyn ContentStore>, StoreError> {
    match &config.export_file {
        Some(file) => {
            let path = base_dir.join(file);
            Ok(Arc::new(ExportStore::open(&path)?))
        }
        None => Ok(Arc::new(HttpStore::new(config)?)),
    }
}
