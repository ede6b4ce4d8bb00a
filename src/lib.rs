//! # Urban Site
//!
//! Static site generator for the Urban creative production agency. Content
//! lives in a headless content store (or a local NDJSON export of one); the
//! site is plain HTML with inline CSS and a few small scripts for
//! scroll-reveal, the testimonial carousel and inline form validation.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Fetch     store     →  manifest.json   (documents → display-ready records)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so a build can be inspected or
//! regenerated without touching the network. Each section of the manifest
//! carries its load status: a collection that failed, timed out or came back
//! empty still renders, as a skeleton with a short message.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Read-only query boundary: HTTP API, NDJSON export, offline stand-in |
//! | [`cache`] | Snapshot cache so an unreachable store falls back to the last good fetch |
//! | [`resolver`] | `fetch_collection`, `fetch_by_slug`, `resolve_image`; ordering rules |
//! | [`image`] | Image references to CDN URLs with a placeholder fallback |
//! | [`content`] | Normalized records per section (work, services, posts, ...) |
//! | [`mount`] | Single-delivery slots so unmounted sections drop late results |
//! | [`fetch`] | Stage 1, concurrent per-section fetch under a deadline |
//! | [`reveal`] | Scroll-reveal orchestration: hidden → revealed exactly once |
//! | [`sections`] | Maud renderers for every page section |
//! | [`carousel`] | Auto-advancing slide state |
//! | [`contact`] | Contact form validation and delivery |
//! | [`map`] | Office location embed |
//! | [`pages`] | Full documents assembled from sections |
//! | [`routes`] | Path → page, with 404s for unknown paths and slugs |
//! | [`generate`] | Stage 2, writes every route to disk |
//! | [`config`] | `site.toml` loading, validation, env overrides, CSS variables |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Raw document model shared by the store and resolver |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Markup is checked
//! at compile time and every interpolation is escaped, which matters here
//! because titles and body text come straight from editors.
//!
//! ## Reveal Without a Runtime
//!
//! Reveal state is computed at build time for the first screen and written
//! into the markup. The inline script only observes what is still hidden,
//! and the hiding CSS applies under `html.js`, so a visitor without
//! JavaScript sees every element.

pub mod cache;
pub mod carousel;
pub mod config;
pub mod contact;
pub mod content;
pub mod fetch;
pub mod generate;
pub mod image;
pub mod logging;
pub mod map;
pub mod mount;
pub mod output;
pub mod pages;
pub mod resolver;
pub mod reveal;
pub mod routes;
pub mod sections;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
