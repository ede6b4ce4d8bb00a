//! Content snapshot cache for resilient builds.
//!
//! The content store is the only thing a build needs from the network. This
//! module keeps the last good answer to every query on disk so that a store
//! outage degrades to slightly stale content instead of empty sections.
//!
//! # Design
//!
//! [`CachedStore`] wraps any [`ContentStore`]. Every query goes to the inner
//! store first; a successful answer is recorded, and a failed one is answered
//! from the snapshot when one exists (stale-if-error). The cache never
//! short-circuits a healthy store, so edits always show up on the next build.
//!
//! ## Cache keys
//!
//! Entries are keyed by the SHA-256 of [`Query::cache_key`], the GROQ text
//! plus its parameters. Changing a query (new ordering, new filter) therefore
//! never serves a snapshot recorded for the old one.
//!
//! ## Storage
//!
//! The snapshot is a JSON file at `<temp_dir>/.content-cache.json`. It is
//! loaded once, updated in memory by concurrent fetches, and written back by
//! [`CachedStore::save`] after the fetch stage.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `fetch` or `build` to query the store directly. The
//! existing snapshot is left untouched.

use crate::store::{ContentStore, Query, StoreError};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Name of the snapshot file within the temp directory.
const MANIFEST_FILENAME: &str = ".content-cache.json";

/// Version of the snapshot format. Bump this to invalidate all existing
/// snapshots when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// The last good answer to one query.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct CacheEntry {
    /// GROQ text, kept for humans reading the file.
    pub query: String,
    pub documents: Vec<Value>,
}

/// On-disk snapshot mapping query hashes to their last good answers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// Create an empty manifest (first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the temp directory. Returns an empty manifest if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(dir: &Path) -> Self {
        let path = manifest_path(dir);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest
    }

    /// Save to the temp directory.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(dir), json)
    }

    pub fn get(&self, query: &Query) -> Option<&CacheEntry> {
        self.entries.get(&hash_query(query))
    }

    pub fn insert(&mut self, query: &Query, documents: Vec<Value>) {
        self.entries.insert(
            hash_query(query),
            CacheEntry {
                query: query.groq(),
                documents,
            },
        );
    }
}

/// SHA-256 hash of a query and its parameters, returned as a hex string.
pub fn hash_query(query: &Query) -> String {
    let digest = Sha256::digest(query.cache_key().as_bytes());
    format!("{:x}", digest)
}

/// Summary of cache behaviour for a fetch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Answered by the live store (and recorded).
    pub fresh: u32,
    /// Store failed, answered from the snapshot.
    pub stale: u32,
    /// Store failed and no snapshot existed.
    pub missed: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.fresh + self.stale + self.missed
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stale > 0 || self.missed > 0 {
            write!(
                f,
                "{} fresh, {} from snapshot, {} unavailable ({} total)",
                self.fresh,
                self.stale,
                self.missed,
                self.total()
            )
        } else {
            write!(f, "{} fresh", self.fresh)
        }
    }
}

/// A panicked fetch thread leaves the data consistent: every critical section
/// is a single insert or counter bump.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A store decorator that records good answers and replays them on failure.
pub struct CachedStore {
    inner: Arc<dyn ContentStore>,
    dir: PathBuf,
    manifest: Mutex<CacheManifest>,
    stats: Mutex<CacheStats>,
}

impl CachedStore {
    pub fn new(inner: Arc<dyn ContentStore>, dir: &Path) -> Self {
        Self {
            inner,
            dir: dir.to_path_buf(),
            manifest: Mutex::new(CacheManifest::load(dir)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        *lock(&self.stats)
    }

    /// Write the snapshot back to disk.
    pub fn save(&self) -> io::Result<()> {
        lock(&self.manifest).save(&self.dir)
    }
}

impl ContentStore for CachedStore {
    fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        match self.inner.query(query) {
            Ok(documents) => {
                lock(&self.manifest).insert(query, documents.clone());
                lock(&self.stats).fresh += 1;
                Ok(documents)
            }
            Err(e) => {
                let cached = lock(&self.manifest)
                    .get(query)
                    .map(|entry| entry.documents.clone());
                match cached {
                    Some(documents) => {
                        warn!(kind = %query.kind, "store failed ({e}), serving snapshot");
                        lock(&self.stats).stale += 1;
                        Ok(documents)
                    }
                    None => {
                        debug!(kind = %query.kind, "store failed and no snapshot exists");
                        lock(&self.stats).missed += 1;
                        Err(e)
                    }
                }
            }
        }
    }
}

/// Resolve the snapshot path for a temp directory.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}
