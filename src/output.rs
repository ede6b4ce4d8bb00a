//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **content-centric, not file-centric**. Every section leads with
//! its label and what arrived (count and load status); output files are shown
//! as secondary context after `→`. A degraded section is flagged on its own
//! line so a build that fell back to empty states is obvious at a glance.
//!
//! # Output Format
//!
//! ## Fetch
//!
//! ```text
//! Content
//! 001 Work (3 items)
//! 002 Services (empty)
//! 003 Testimonials (unavailable)
//!     Rendered with its empty state
//!
//! Cache: 6 fresh, 1 from snapshot, 1 unavailable (8 total)
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 About → about/index.html
//! 002 Work → work/index.html
//!     001 film → work/category/film/index.html
//!     002 dankira → work/dankira/index.html
//!
//! Generated 8 pages, 3 assets
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::cache::CacheStats;
use crate::contact::{ContactError, Receipt};
use crate::fetch::{FetchEvent, LoadStatus, Manifest, SectionReport};
use crate::generate::GenerateReport;
use crate::routes::Route;
use crate::types::DocumentKind;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human label for a document kind.
pub fn kind_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Work => "Work",
        DocumentKind::Service => "Services",
        DocumentKind::Testimonial => "Testimonials",
        DocumentKind::BlogPost => "Blog posts",
        DocumentKind::NavigationHeader => "Header",
        DocumentKind::ClientLogo => "Clients",
        DocumentKind::Hero => "Hero",
        DocumentKind::TeamMember => "Team",
    }
}

fn status_detail(report: &SectionReport) -> String {
    match report.status {
        LoadStatus::Loaded if report.count == 1 => "1 item".to_string(),
        LoadStatus::Loaded => format!("{} items", report.count),
        LoadStatus::Empty => "empty".to_string(),
        LoadStatus::Unavailable => "unavailable".to_string(),
        LoadStatus::TimedOut => "timed out".to_string(),
    }
}

/// Format a section line: positional index, label, and what arrived.
///
/// ```text
/// 001 Work (3 items)
/// 003 Testimonials (unavailable)
///     Rendered with its empty state
/// ```
fn section_lines(index: usize, report: &SectionReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({})",
        format_index(index),
        kind_label(report.kind),
        status_detail(report)
    )];
    if report.status.is_degraded() {
        lines.push(format!("{}Rendered with its empty state", indent(1)));
    }
    lines
}

// ============================================================================
// Stage 1: Fetch output
// ============================================================================

/// Format a single fetch progress event as display lines. Events arrive in
/// completion order, so they carry no positional index.
pub fn format_fetch_event(event: &FetchEvent) -> Vec<String> {
    match event {
        FetchEvent::Section(report) => {
            let mut lines = vec![format!("{} ({})", kind_label(report.kind), status_detail(report))];
            if report.status.is_degraded() {
                lines.push(format!("{}Rendered with its empty state", indent(1)));
            }
            lines
        }
        FetchEvent::StoreOffline(reason) => vec![
            "Content store unavailable".to_string(),
            format!("{}{}", indent(1), reason),
        ],
    }
}

/// Format the content inventory of a fetched manifest, in fixed kind order.
pub fn format_inventory(manifest: &Manifest, cache: Option<&CacheStats>) -> Vec<String> {
    let mut lines = vec!["Content".to_string()];
    let mut reports: Vec<&SectionReport> = manifest.sections.iter().collect();
    reports.sort_by_key(|r| r.kind);
    for (i, report) in reports.into_iter().enumerate() {
        lines.extend(section_lines(i + 1, report));
    }
    if let Some(stats) = cache {
        lines.push(String::new());
        lines.push(format!("Cache: {stats}"));
    }
    lines
}

/// Print the content inventory to stdout.
pub fn print_inventory(manifest: &Manifest, cache: Option<&CacheStats>) {
    for line in format_inventory(manifest, cache) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

fn route_title(route: &Route) -> String {
    match route {
        Route::Home => "Home".to_string(),
        Route::About => "About".to_string(),
        Route::Services => "Services".to_string(),
        Route::Work => "Work".to_string(),
        Route::Blog => "Blog".to_string(),
        Route::Contact => "Contact".to_string(),
        Route::WorkCategory(s) | Route::WorkDetail(s) | Route::BlogDetail(s) => s.clone(),
        Route::Unknown(p) => p.clone(),
    }
}

/// The listing a child route is shown under.
fn parent(route: &Route) -> Option<Route> {
    match route {
        Route::WorkCategory(_) | Route::WorkDetail(_) => Some(Route::Work),
        Route::BlogDetail(_) => Some(Route::Blog),
        _ => None,
    }
}

/// Format generate stage output: top-level pages in order, each listing
/// followed by its category and detail pages.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let top: Vec<_> = report.pages.iter().filter(|p| parent(&p.route).is_none()).collect();

    let mut position = 0;
    for page in &top {
        if page.route == Route::Home {
            lines.push(format!("Home \u{2192} {}", page.file));
            continue;
        }
        position += 1;
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(position),
            route_title(&page.route),
            page.file
        ));
        let children = report
            .pages
            .iter()
            .filter(|p| parent(&p.route).as_ref() == Some(&page.route));
        for (i, child) in children.enumerate() {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(i + 1),
                route_title(&child.route),
                child.file
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, {} assets",
        report.pages.len(),
        report.assets.len()
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Contact output
// ============================================================================

/// Format a contact submission result. Validation failures list one line per
/// field with its inline message.
pub fn format_contact_result(result: &Result<Receipt, ContactError>) -> Vec<String> {
    match result {
        Ok(receipt) => vec![format!("Message sent (reference {})", receipt.reference)],
        Err(ContactError::Validation(errors)) => {
            let mut lines = vec!["Message not sent".to_string()];
            for e in errors {
                lines.push(format!("{}{}: {}", indent(1), e.field, e.message));
            }
            lines
        }
        Err(e @ ContactError::Delivery(_)) => vec!["Message not sent".to_string(), format!("{}{e}", indent(1))],
    }
}

pub fn print_contact_result(result: &Result<Receipt, ContactError>) {
    for line in format_contact_result(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::contact::{Field, FieldError};
    use crate::generate::GeneratedPage;

    fn report(kind: DocumentKind, status: LoadStatus, count: usize) -> SectionReport {
        SectionReport { kind, status, count }
    }

    fn page(route: Route, file: &str) -> GeneratedPage {
        GeneratedPage {
            route,
            file: file.to_string(),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    #[test]
    fn fetch_event_loaded_section() {
        let lines = format_fetch_event(&FetchEvent::Section(report(DocumentKind::Work, LoadStatus::Loaded, 3)));
        assert_eq!(lines, vec!["Work (3 items)"]);
    }

    #[test]
    fn fetch_event_degraded_section_is_flagged() {
        let lines = format_fetch_event(&FetchEvent::Section(report(
            DocumentKind::Testimonial,
            LoadStatus::TimedOut,
            0,
        )));
        assert_eq!(lines[0], "Testimonials (timed out)");
        assert_eq!(lines[1], "    Rendered with its empty state");
    }

    #[test]
    fn fetch_event_store_offline() {
        let lines = format_fetch_event(&FetchEvent::StoreOffline("no route to host".into()));
        assert_eq!(lines, vec!["Content store unavailable", "    no route to host"]);
    }

    #[test]
    fn inventory_is_in_kind_order_with_cache_line() {
        let mut manifest = Manifest::empty(SiteConfig::default());
        manifest.sections = vec![
            report(DocumentKind::Service, LoadStatus::Empty, 0),
            report(DocumentKind::Work, LoadStatus::Loaded, 1),
        ];
        let stats = CacheStats {
            fresh: 2,
            stale: 0,
            missed: 0,
        };
        let lines = format_inventory(&manifest, Some(&stats));
        assert_eq!(lines[0], "Content");
        assert_eq!(lines[1], "001 Work (1 item)");
        assert_eq!(lines[2], "002 Services (empty)");
        assert!(lines.last().unwrap().starts_with("Cache: "));
    }

    // =========================================================================
    // Generate
    // =========================================================================

    #[test]
    fn generate_output_nests_children_under_listing() {
        let report = GenerateReport {
            pages: vec![
                page(Route::Home, "index.html"),
                page(Route::About, "about/index.html"),
                page(Route::Work, "work/index.html"),
                page(Route::WorkCategory("film".into()), "work/category/film/index.html"),
                page(Route::WorkDetail("dankira".into()), "work/dankira/index.html"),
                page(Route::Blog, "blog/index.html"),
                page(Route::BlogDetail("connection".into()), "blog/connection/index.html"),
            ],
            assets: vec!["404.html".into()],
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "Home \u{2192} index.html");
        assert_eq!(lines[1], "001 About \u{2192} about/index.html");
        assert_eq!(lines[2], "002 Work \u{2192} work/index.html");
        assert_eq!(lines[3], "    001 film \u{2192} work/category/film/index.html");
        assert_eq!(lines[4], "    002 dankira \u{2192} work/dankira/index.html");
        assert_eq!(lines[5], "003 Blog \u{2192} blog/index.html");
        assert_eq!(lines[6], "    001 connection \u{2192} blog/connection/index.html");
        assert_eq!(lines.last().unwrap(), "Generated 7 pages, 1 assets");
    }

    // =========================================================================
    // Contact
    // =========================================================================

    #[test]
    fn contact_validation_lists_each_field() {
        let result = Err(ContactError::Validation(vec![
            FieldError {
                field: Field::Name,
                message: "Please enter your name.",
            },
            FieldError {
                field: Field::Email,
                message: "Please enter a valid email address.",
            },
        ]));
        let lines = format_contact_result(&result);
        assert_eq!(lines[1], "    name: Please enter your name.");
        assert_eq!(lines[2], "    email: Please enter a valid email address.");
    }

    #[test]
    fn contact_success_shows_reference() {
        let result = Ok(Receipt {
            reference: "abc123def456".into(),
        });
        assert_eq!(format_contact_result(&result), vec!["Message sent (reference abc123def456)"]);
    }
}
