//! Path routing.
//!
//! | Path | Page |
//! |---|---|
//! | `/` | home |
//! | `/about`, `/services`, `/blog`, `/contact` | listings and static pages |
//! | `/work` | work listing, all categories |
//! | `/work/category/<category>` | work listing under one filter |
//! | `/work/<slug>`, `/blog/<slug>` | detail pages, looked up through a [`SlugSource`] |
//!
//! A slug with no matching document renders the not-found view with a link
//! back to its listing and status 404. Any other unknown path gets the same
//! view linking home.

use crate::content::{ALL_FILTER, BlogPost, WorkItem, category_slug, work_filters};
use crate::contact::ContactSession;
use crate::fetch::Manifest;
use crate::pages::Pages;
use crate::resolver::{ContentError, Resolver, SlugLookup};
use crate::sections::not_found::NotFound;
use crate::types::DocumentKind;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Services,
    Work,
    WorkCategory(String),
    WorkDetail(String),
    Blog,
    BlogDetail(String),
    Contact,
    Unknown(String),
}

/// `/work/dankira/index.html?x=1#top` → `/work/dankira`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_suffix("index.html").unwrap_or(path);
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["services"] => Route::Services,
            ["work"] => Route::Work,
            ["work", "category", category] => Route::WorkCategory(category.to_string()),
            ["work", slug] => Route::WorkDetail(slug.to_string()),
            ["blog"] => Route::Blog,
            ["blog", slug] => Route::BlogDetail(slug.to_string()),
            ["contact"] => Route::Contact,
            _ => Route::Unknown(normalized),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Services => "/services".to_string(),
            Route::Work => "/work".to_string(),
            Route::WorkCategory(c) => format!("/work/category/{c}"),
            Route::WorkDetail(s) => format!("/work/{s}"),
            Route::Blog => "/blog".to_string(),
            Route::BlogDetail(s) => format!("/blog/{s}"),
            Route::Contact => "/contact".to_string(),
            Route::Unknown(p) => p.clone(),
        }
    }
}

/// Every route the manifest can produce, in generation order.
pub fn site_routes(manifest: &Manifest) -> Vec<Route> {
    let mut routes = vec![
        Route::Home,
        Route::About,
        Route::Services,
        Route::Work,
        Route::Blog,
        Route::Contact,
    ];
    routes.extend(
        work_filters(&manifest.works.items)
            .iter()
            .filter(|f| f.as_str() != ALL_FILTER)
            .map(|f| Route::WorkCategory(category_slug(f))),
    );
    routes.extend(
        manifest
            .works
            .items
            .iter()
            .filter_map(|w| w.slug.clone())
            .map(Route::WorkDetail),
    );
    routes.extend(
        manifest
            .posts
            .items
            .iter()
            .filter_map(|p| p.slug.clone())
            .map(Route::BlogDetail),
    );
    routes
}

/// Where detail pages look up their slug.
pub trait SlugSource {
    fn work(&self, slug: &str) -> Result<Option<WorkItem>, ContentError>;
    fn post(&self, slug: &str) -> Result<Option<BlogPost>, ContentError>;
}

/// Exact, case-sensitive match against fetched content.
impl SlugSource for Manifest {
    fn work(&self, slug: &str) -> Result<Option<WorkItem>, ContentError> {
        Ok(self.works.items.iter().find(|w| w.slug.as_deref() == Some(slug)).cloned())
    }

    fn post(&self, slug: &str) -> Result<Option<BlogPost>, ContentError> {
        Ok(self.posts.items.iter().find(|p| p.slug.as_deref() == Some(slug)).cloned())
    }
}

/// Queries the store for each lookup.
pub struct LiveSlugs<'a> {
    resolver: &'a Resolver,
}

impl<'a> LiveSlugs<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    fn lookup<T>(
        &self,
        kind: DocumentKind,
        slug: &str,
        normalize: impl FnOnce(&crate::types::ContentDocument) -> T,
    ) -> Result<Option<T>, ContentError> {
        match self.resolver.fetch_by_slug(kind, slug)? {
            SlugLookup::Found(doc) => Ok(Some(normalize(&doc))),
            SlugLookup::NotFound => Ok(None),
        }
    }
}

impl SlugSource for LiveSlugs<'_> {
    fn work(&self, slug: &str) -> Result<Option<WorkItem>, ContentError> {
        let images = self.resolver.images();
        self.lookup(DocumentKind::Work, slug, |doc| WorkItem::from_document(doc, images))
    }

    fn post(&self, slug: &str) -> Result<Option<BlogPost>, ContentError> {
        let images = self.resolver.images();
        self.lookup(DocumentKind::BlogPost, slug, |doc| BlogPost::from_document(doc, images))
    }
}

/// A rendered route.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub route: Route,
    /// HTTP semantics: 200, 404, or 503 when a live lookup failed.
    pub status: u16,
    pub html: String,
}

impl RouteOutcome {
    pub fn is_found(&self) -> bool {
        self.status == 200
    }
}

fn listing_not_found(pages: &Pages<'_>, route: Route, listing: &str, label: &str, status: u16) -> RouteOutcome {
    let view = NotFound::listing(&route.path(), listing, label);
    RouteOutcome {
        route,
        status,
        html: pages.not_found(&view).into_string(),
    }
}

/// Render `path`. Detail slugs are looked up in `slugs`; everything else
/// comes from the pages' manifest.
pub fn resolve_route(pages: &Pages<'_>, path: &str, slugs: &dyn SlugSource) -> RouteOutcome {
    let route = Route::parse(path);
    debug!(path, ?route, "resolving route");
    let found = |route: Route, html: maud::Markup| RouteOutcome {
        route,
        status: 200,
        html: html.into_string(),
    };
    match &route {
        Route::Home => found(route.clone(), pages.home()),
        Route::About => found(route.clone(), pages.about()),
        Route::Services => found(route.clone(), pages.services()),
        Route::Work => found(route.clone(), pages.work(ALL_FILTER)),
        Route::Blog => found(route.clone(), pages.blog()),
        Route::Contact => found(route.clone(), pages.contact(&ContactSession::new())),
        Route::WorkCategory(category) => {
            let filter = work_filters(&pages.manifest().works.items)
                .into_iter()
                .find(|f| f.as_str() != ALL_FILTER && category_slug(f) == *category);
            match filter {
                Some(filter) => found(route.clone(), pages.work(&filter)),
                None => listing_not_found(pages, route.clone(), "/work", "WORK", 404),
            }
        }
        Route::WorkDetail(slug) => match slugs.work(slug) {
            Ok(Some(item)) => found(route.clone(), pages.work_detail(&item)),
            Ok(None) => listing_not_found(pages, route.clone(), "/work", "WORK", 404),
            Err(e) => {
                warn!("work lookup for {slug} failed: {e}");
                listing_not_found(pages, route.clone(), "/work", "WORK", 503)
            }
        },
        Route::BlogDetail(slug) => match slugs.post(slug) {
            Ok(Some(post)) => found(route.clone(), pages.post(&post)),
            Ok(None) => listing_not_found(pages, route.clone(), "/blog", "BLOGS", 404),
            Err(e) => {
                warn!("post lookup for {slug} failed: {e}");
                listing_not_found(pages, route.clone(), "/blog", "BLOGS", 503)
            }
        },
        Route::Unknown(p) => RouteOutcome {
            html: pages.not_found(&NotFound::home(p)).into_string(),
            route: route.clone(),
            status: 404,
        },
    }
}
