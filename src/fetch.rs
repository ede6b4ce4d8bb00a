//! Content fetching.
//!
//! Stage 1 of the build pipeline. Queries every section's content from the
//! store and writes a normalized manifest for the generator.
//!
//! ## Concurrency
//!
//! One job per document kind is spawned on the rayon pool; none waits on
//! another. Each job delivers into its own [`SectionSlot`](crate::mount::SectionSlot)
//! and pings the collector:
//!
//! ```text
//!   spawn ×8 ──► fetch_collection(kind) ──► deliver(slot) ──► notify
//!                                                               │
//!   collector: recv until all 8 arrive or the deadline passes ◄─┘
//! ```
//!
//! Slots still empty at the deadline are unmounted; their fetches finish in
//! the background and are discarded without a trace. The section renders its
//! empty state.
//!
//! ## Degradation
//!
//! Nothing here fails because of content. A kind whose fetch fails is
//! recorded as [`LoadStatus::Unavailable`] and rendered empty; the store
//! failing to open at all degrades every section the same way. Only writing
//! the manifest can fail the stage.

use crate::cache::{CacheStats, CachedStore};
use crate::config::{self, SiteConfig};
use crate::content::{BlogPost, ClientLogo, Hero, Service, SiteHeader, TeamMember, Testimonial, WorkItem};
use crate::image::ImageResolver;
use crate::mount::{self, SectionSlot};
use crate::resolver::{ContentError, Resolver};
use crate::store::{self, ContentStore, OfflineStore};
use crate::types::{ContentDocument, DocumentKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// How a section's content arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded,
    /// The store answered with zero documents.
    Empty,
    /// The store failed; rendered empty.
    Unavailable,
    /// The fetch missed the deadline; rendered empty.
    TimedOut,
}

impl LoadStatus {
    pub fn is_degraded(self) -> bool {
        matches!(self, LoadStatus::Unavailable | LoadStatus::TimedOut)
    }
}

/// One section's normalized content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loaded<T> {
    pub status: LoadStatus,
    pub items: Vec<T>,
}

impl<T> Loaded<T> {
    pub fn new(items: Vec<T>) -> Self {
        let status = if items.is_empty() {
            LoadStatus::Empty
        } else {
            LoadStatus::Loaded
        };
        Self { status, items }
    }

    pub fn degraded(status: LoadStatus) -> Self {
        Self {
            status,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Per-kind summary for the inventory output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub kind: DocumentKind,
    pub status: LoadStatus,
    pub count: usize,
}

/// Normalized content of the whole site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub header: SiteHeader,
    pub hero: Hero,
    pub works: Loaded<WorkItem>,
    pub services: Loaded<Service>,
    pub testimonials: Loaded<Testimonial>,
    pub posts: Loaded<BlogPost>,
    pub clients: Loaded<ClientLogo>,
    pub team: Loaded<TeamMember>,
    pub sections: Vec<SectionReport>,
    pub config: SiteConfig,
}

impl Manifest {
    /// A manifest with no content: every section in its empty state.
    pub fn empty(config: SiteConfig) -> Self {
        Self {
            header: SiteHeader::default(),
            hero: Hero::default(),
            works: Loaded::default(),
            services: Loaded::default(),
            testimonials: Loaded::default(),
            posts: Loaded::default(),
            clients: Loaded::default(),
            team: Loaded::default(),
            sections: Vec::new(),
            config,
        }
    }

    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn report(&self, kind: DocumentKind) -> Option<&SectionReport> {
        self.sections.iter().find(|r| r.kind == kind)
    }
}

/// Progress events for the CLI printer.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    Section(SectionReport),
    /// The store could not be opened; every section renders empty.
    StoreOffline(String),
}

pub struct FetchResult {
    pub manifest: Manifest,
    /// `None` when the snapshot cache was bypassed.
    pub cache_stats: Option<CacheStats>,
}

/// Open the configured store, fetch every section and build the manifest.
///
/// `base_dir` anchors a relative `store.export_file`; the snapshot cache
/// lives in `temp_dir`.
pub fn fetch(
    config: &SiteConfig,
    base_dir: &Path,
    temp_dir: &Path,
    use_cache: bool,
    events: Option<Sender<FetchEvent>>,
) -> Result<FetchResult, FetchError> {
    let inner: Arc<dyn ContentStore> = match store::open(&config.store, base_dir) {
        Ok(s) => s,
        Err(e) => {
            warn!("content store unavailable: {e}");
            if let Some(tx) = &events {
                tx.send(FetchEvent::StoreOffline(e.to_string())).ok();
            }
            Arc::new(OfflineStore::new(e.to_string()))
        }
    };

    let cached = use_cache.then(|| Arc::new(CachedStore::new(Arc::clone(&inner), temp_dir)));
    let store: Arc<dyn ContentStore> = match &cached {
        Some(c) => Arc::clone(c) as Arc<dyn ContentStore>,
        None => inner,
    };

    let resolver = Arc::new(Resolver::new(
        store,
        ImageResolver::new(&config.store, &config.images),
    ));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(&config.fetch))
        .thread_name(|i| format!("fetch-{i}"))
        .build()?;
    let deadline = Duration::from_secs(config.fetch.deadline_secs);
    let manifest = fetch_sections(resolver, config.clone(), deadline, &pool, events);

    let cache_stats = match cached {
        Some(c) => {
            c.save()?;
            Some(c.stats())
        }
        None => None,
    };
    Ok(FetchResult {
        manifest,
        cache_stats,
    })
}

type Fetched = Result<Vec<ContentDocument>, ContentError>;

/// Fetch every kind concurrently on `pool` and normalize whatever arrives
/// within `deadline`.
pub fn fetch_sections(
    resolver: Arc<Resolver>,
    config: SiteConfig,
    deadline: Duration,
    pool: &rayon::ThreadPool,
    events: Option<Sender<FetchEvent>>,
) -> Manifest {
    let started = Instant::now();
    let (tx, rx) = mpsc::channel::<DocumentKind>();
    let mut slots: BTreeMap<DocumentKind, SectionSlot<Fetched>> = BTreeMap::new();

    for kind in DocumentKind::ALL {
        let (slot, delivery) = mount::slot::<Fetched>();
        let resolver = Arc::clone(&resolver);
        let tx = tx.clone();
        pool.spawn(move || {
            let result = resolver.fetch_collection(kind);
            if delivery.deliver(result) {
                tx.send(kind).ok();
            }
        });
        slots.insert(kind, slot);
    }
    drop(tx);

    let until = started + deadline;
    let mut arrived = 0;
    while arrived < slots.len() {
        let remaining = until.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(kind) => {
                debug!(%kind, elapsed = ?started.elapsed(), "section arrived");
                arrived += 1;
            }
            Err(_) => break,
        }
    }

    let mut fetched: BTreeMap<DocumentKind, Option<Fetched>> = BTreeMap::new();
    for (kind, slot) in slots {
        let value = slot.take();
        if value.is_none() {
            warn!(%kind, "fetch missed the {deadline:?} deadline; section left empty");
        }
        // Dropping the slot unmounts it.
        fetched.insert(kind, value);
    }

    let images = resolver.images();
    let mut manifest = Manifest::empty(config);
    let mut reports = Vec::new();

    for (kind, result) in fetched {
        let (status, docs) = match result {
            Some(Ok(docs)) if docs.is_empty() => (LoadStatus::Empty, docs),
            Some(Ok(docs)) => (LoadStatus::Loaded, docs),
            Some(Err(e)) => {
                warn!("{e}; section left empty");
                (LoadStatus::Unavailable, Vec::new())
            }
            None => (LoadStatus::TimedOut, Vec::new()),
        };

        let count = match kind {
            DocumentKind::NavigationHeader => {
                if let Some(doc) = docs.first() {
                    manifest.header = SiteHeader::from_document(doc, images);
                }
                docs.len().min(1)
            }
            DocumentKind::Hero => {
                if let Some(doc) = docs.first() {
                    manifest.hero = Hero::from_document(doc, images);
                }
                docs.len().min(1)
            }
            DocumentKind::Work => {
                manifest.works = normalize(status, &docs, |d| Some(WorkItem::from_document(d, images)));
                manifest.works.items.len()
            }
            DocumentKind::Service => {
                manifest.services = normalize(status, &docs, |d| Some(Service::from_document(d, images)));
                manifest.services.items.len()
            }
            DocumentKind::Testimonial => {
                manifest.testimonials = normalize(status, &docs, Testimonial::from_document);
                manifest.testimonials.items.len()
            }
            DocumentKind::BlogPost => {
                manifest.posts = normalize(status, &docs, |d| Some(BlogPost::from_document(d, images)));
                manifest.posts.items.len()
            }
            DocumentKind::ClientLogo => {
                manifest.clients = normalize(status, &docs, |d| Some(ClientLogo::from_document(d, images)));
                manifest.clients.items.len()
            }
            DocumentKind::TeamMember => {
                manifest.team = normalize(status, &docs, |d| Some(TeamMember::from_document(d, images)));
                manifest.team.items.len()
            }
        };

        let report = SectionReport {
            kind,
            status,
            count,
        };
        if let Some(tx) = &events {
            tx.send(FetchEvent::Section(report.clone())).ok();
        }
        reports.push(report);
    }

    manifest.sections = reports;
    info!(elapsed = ?started.elapsed(), "content fetched");
    manifest
}

fn normalize<T>(
    status: LoadStatus,
    docs: &[ContentDocument],
    f: impl Fn(&ContentDocument) -> Option<T>,
) -> Loaded<T> {
    if status.is_degraded() {
        return Loaded::degraded(status);
    }
    Loaded::new(docs.iter().filter_map(f).collect())
}
