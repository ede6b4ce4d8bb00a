//! Scroll-reveal orchestration.
//!
//! Every element flagged for reveal runs a two-state machine:
//!
//! ```text
//!              threshold met            delay elapsed
//!   Hidden ───────────────────► pending ───────────────► Revealed
//!     ▲  (observe)                 │      (advance)          │
//!     │                            │ deregister              │ no further
//!     └── registered ──────────────┴──► gone                 ▼ transitions
//! ```
//!
//! An element already inside the viewport when it is registered starts
//! `Revealed`, so above-the-fold content never paints hidden. Everything else
//! starts `Hidden` and is revealed at most once, after its delay, by
//! [`Orchestrator::advance`]. Once revealed an element stops being observed;
//! later reports for it are ignored.
//!
//! Groups get a stagger: member `i` waits `delay + i * stagger`, so a grid
//! animates in reading order.
//!
//! ## Build-time use
//!
//! Pages are rendered ahead of time, so the generator drives the orchestrator
//! against a nominal viewport ([`FirstPaint`]) to decide each element's
//! initial state and delay. Sections register through a [`SectionMount`],
//! which deregisters everything it registered when dropped. The embedded
//! `reveal.js` runs the same machine in the browser with the thresholds and
//! delays emitted here.

use crate::config::RevealConfig;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Opaque identifier of a revealable element within one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealed,
}

impl RevealState {
    /// Value of the `data-reveal` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            RevealState::Hidden => "hidden",
            RevealState::Revealed => "revealed",
        }
    }
}

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    fn overlap(&self, other: &Rect) -> f64 {
        let w = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let h = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        w.max(0.0) * h.max(0.0)
    }
}

/// One visibility report: where an element's box is relative to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub handle: ElementHandle,
    pub bounds: Rect,
    pub viewport: Rect,
}

impl Intersection {
    /// Fraction of the element's box inside the viewport. A box with no area
    /// (not laid out yet) is never visible.
    pub fn ratio(&self) -> f64 {
        let area = self.bounds.area();
        if area <= 0.0 {
            return 0.0;
        }
        (self.bounds.overlap(&self.viewport) / area).clamp(0.0, 1.0)
    }

    pub fn meets(&self, threshold: f64) -> bool {
        let ratio = self.ratio();
        ratio > 0.0 && ratio >= threshold
    }
}

/// Trigger parameters shared by a registration or a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpec {
    /// Fraction of the box that must be visible.
    pub threshold: f64,
    /// Base delay before the transition starts.
    pub delay: Duration,
    /// Added per group position.
    pub stagger: Duration,
}

impl RevealSpec {
    pub fn from_config(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            delay: Duration::ZERO,
            stagger: Duration::from_millis(config.stagger_ms),
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Delay of the member at `position` in a group.
    pub fn staggered(&self, position: usize) -> Duration {
        let step = u32::try_from(position).unwrap_or(u32::MAX);
        self.delay.saturating_add(self.stagger.saturating_mul(step))
    }
}

#[derive(Debug)]
struct Element {
    seq: u64,
    threshold: f64,
    delay: Duration,
    state: RevealState,
    /// When the scheduled transition fires.
    due: Option<Instant>,
}

/// Per-page registry of revealable elements.
#[derive(Debug, Default)]
pub struct Orchestrator {
    elements: HashMap<ElementHandle, Element>,
    next_seq: u64,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one element. Returns its initial state. Registering a handle
    /// twice keeps the first registration.
    pub fn register(
        &mut self,
        handle: ElementHandle,
        spec: RevealSpec,
        initial: Option<&Intersection>,
    ) -> RevealState {
        self.insert(handle, spec.threshold, spec.delay, initial)
    }

    /// Register sibling elements in reading order with staggered delays.
    /// Returns the delays assigned.
    pub fn register_group(&mut self, handles: &[ElementHandle], spec: RevealSpec) -> Vec<Duration> {
        let members: Vec<_> = handles.iter().map(|h| (h.clone(), None)).collect();
        self.register_group_at(members, spec)
    }

    /// [`register_group`](Self::register_group) with an initial visibility
    /// report per member.
    pub fn register_group_at(
        &mut self,
        members: Vec<(ElementHandle, Option<Intersection>)>,
        spec: RevealSpec,
    ) -> Vec<Duration> {
        members
            .into_iter()
            .enumerate()
            .map(|(i, (handle, initial))| {
                let delay = spec.staggered(i);
                self.insert(handle, spec.threshold, delay, initial.as_ref());
                delay
            })
            .collect()
    }

    fn insert(
        &mut self,
        handle: ElementHandle,
        threshold: f64,
        delay: Duration,
        initial: Option<&Intersection>,
    ) -> RevealState {
        if let Some(existing) = self.elements.get(&handle) {
            return existing.state;
        }
        let state = match initial {
            Some(report) if report.meets(threshold) => RevealState::Revealed,
            _ => RevealState::Hidden,
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.insert(
            handle,
            Element {
                seq,
                threshold,
                delay,
                state,
                due: None,
            },
        );
        state
    }

    /// Feed a visibility report. Schedules the transition on the first
    /// threshold crossing; returns whether one was scheduled.
    pub fn observe(&mut self, report: &Intersection, now: Instant) -> bool {
        let Some(element) = self.elements.get_mut(&report.handle) else {
            return false;
        };
        if element.state == RevealState::Revealed || element.due.is_some() {
            return false;
        }
        if !report.meets(element.threshold) {
            return false;
        }
        element.due = Some(now + element.delay);
        true
    }

    /// Fire every transition due at `now`. Returns the revealed handles in
    /// firing order.
    pub fn advance(&mut self, now: Instant) -> Vec<ElementHandle> {
        let mut fired: Vec<(Instant, u64, ElementHandle)> = self
            .elements
            .iter_mut()
            .filter_map(|(handle, element)| {
                let due = element.due.filter(|due| *due <= now)?;
                element.state = RevealState::Revealed;
                element.due = None;
                Some((due, element.seq, handle.clone()))
            })
            .collect();
        fired.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, handle)| handle).collect()
    }

    /// Forget an element, cancelling any pending transition.
    pub fn deregister(&mut self, handle: &ElementHandle) -> bool {
        self.elements.remove(handle).is_some()
    }

    pub fn state(&self, handle: &ElementHandle) -> Option<RevealState> {
        self.elements.get(handle).map(|e| e.state)
    }

    pub fn delay(&self, handle: &ElementHandle) -> Option<Duration> {
        self.elements.get(handle).map(|e| e.delay)
    }

    /// Hidden elements are observed; revealed ones no longer are.
    pub fn is_observing(&self, handle: &ElementHandle) -> bool {
        self.state(handle) == Some(RevealState::Hidden)
    }

    pub fn pending(&self) -> usize {
        self.elements.values().filter(|e| e.due.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ============================================================================
// Build-time page reveal
// ============================================================================

/// Nominal viewport used to decide the first paint at build time.
///
/// Sections are laid out top to bottom; each revealable block occupies the
/// next `height` pixels. Anything inside the first screenful starts revealed.
#[derive(Debug, Clone)]
pub struct FirstPaint {
    viewport: Rect,
    cursor: f64,
}

impl FirstPaint {
    pub const DEFAULT_WIDTH: f64 = 1280.0;
    pub const DEFAULT_HEIGHT: f64 = 800.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, width, height),
            cursor: 0.0,
        }
    }

    /// Reserve `height` pixels without registering anything.
    pub fn skip(&mut self, height: f64) {
        self.cursor += height.max(0.0);
    }

    /// Place a full-width block and report where it lands.
    pub fn place(&mut self, handle: &ElementHandle, height: f64) -> Intersection {
        let bounds = Rect::new(0.0, self.cursor, self.viewport.width, height.max(0.0));
        self.cursor += height.max(0.0);
        Intersection {
            handle: handle.clone(),
            bounds,
            viewport: self.viewport,
        }
    }

    /// Place `count` cells in rows of `columns`, each row `row_height` tall.
    pub fn place_grid(
        &mut self,
        handles: &[ElementHandle],
        columns: usize,
        row_height: f64,
    ) -> Vec<Intersection> {
        let columns = columns.max(1);
        let cell_width = self.viewport.width / columns as f64;
        let top = self.cursor;
        let reports = handles
            .iter()
            .enumerate()
            .map(|(i, handle)| Intersection {
                handle: handle.clone(),
                bounds: Rect::new(
                    (i % columns) as f64 * cell_width,
                    top + (i / columns) as f64 * row_height,
                    cell_width,
                    row_height,
                ),
                viewport: self.viewport,
            })
            .collect();
        let rows = handles.len().div_ceil(columns);
        self.cursor += rows as f64 * row_height;
        reports
    }
}

impl Default for FirstPaint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

/// What a renderer needs to emit for one revealable element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAttrs {
    pub handle: ElementHandle,
    pub state: RevealState,
    pub delay: Duration,
    pub threshold: f64,
}

impl RevealAttrs {
    pub fn delay_ms(&self) -> u128 {
        self.delay.as_millis()
    }

    /// Inline style carrying the transition delay.
    pub fn style(&self) -> String {
        format!("--reveal-delay: {}ms", self.delay_ms())
    }
}

#[derive(Debug)]
struct PageState {
    orchestrator: Orchestrator,
    paint: FirstPaint,
    spec: RevealSpec,
}

/// Shared orchestrator for one page render.
#[derive(Debug, Clone)]
pub struct PageReveal {
    inner: Rc<RefCell<PageState>>,
}

impl PageReveal {
    pub fn new(spec: RevealSpec, paint: FirstPaint) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PageState {
                orchestrator: Orchestrator::new(),
                paint,
                spec,
            })),
        }
    }

    pub fn from_config(config: &RevealConfig) -> Self {
        Self::new(RevealSpec::from_config(config), FirstPaint::default())
    }

    /// Mount a section. Its registrations live until the mount is dropped.
    pub fn mount(&self, section: &str) -> SectionMount {
        SectionMount {
            page: self.clone(),
            section: section.to_string(),
            handles: Vec::new(),
        }
    }

    /// Reserve vertical space for content that does not reveal.
    pub fn skip(&self, height: f64) {
        self.inner.borrow_mut().paint.skip(height);
    }

    /// Number of elements currently registered.
    pub fn registered(&self) -> usize {
        self.inner.borrow().orchestrator.len()
    }

    pub fn state(&self, handle: &ElementHandle) -> Option<RevealState> {
        self.inner.borrow().orchestrator.state(handle)
    }
}

/// A section's registrations for the duration of its render.
///
/// Dropping the mount deregisters every element it registered.
#[derive(Debug)]
pub struct SectionMount {
    page: PageReveal,
    section: String,
    handles: Vec<ElementHandle>,
}

impl SectionMount {
    fn handle(&self, name: &str) -> ElementHandle {
        ElementHandle::new(format!("{}-{name}", self.section))
    }

    /// Register a single full-width block of roughly `height` pixels.
    pub fn reveal(&mut self, name: &str, height: f64) -> RevealAttrs {
        let handle = self.handle(name);
        let mut page = self.page.inner.borrow_mut();
        let report = page.paint.place(&handle, height);
        let spec = page.spec;
        let state = page
            .orchestrator
            .register(handle.clone(), spec, Some(&report));
        self.handles.push(handle.clone());
        RevealAttrs {
            handle,
            state,
            delay: spec.delay,
            threshold: spec.threshold,
        }
    }

    /// Register `count` grid cells as a staggered group.
    pub fn reveal_grid(&mut self, name: &str, count: usize, columns: usize, row_height: f64) -> Vec<RevealAttrs> {
        let handles: Vec<ElementHandle> = (0..count).map(|i| self.handle(&format!("{name}-{i}"))).collect();
        let mut page = self.page.inner.borrow_mut();
        let reports = page.paint.place_grid(&handles, columns, row_height);
        let spec = page.spec;
        let members = handles.iter().cloned().zip(reports.into_iter().map(Some)).collect();
        let delays = page.orchestrator.register_group_at(members, spec);
        let attrs = handles
            .iter()
            .zip(delays)
            .map(|(handle, delay)| RevealAttrs {
                handle: handle.clone(),
                state: page.orchestrator.state(handle).unwrap_or(RevealState::Hidden),
                delay,
                threshold: spec.threshold,
            })
            .collect();
        self.handles.extend(handles);
        attrs
    }

    /// Reserve space for content in this section that does not reveal.
    pub fn skip(&mut self, height: f64) {
        self.page.skip(height);
    }

    pub fn registered(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for SectionMount {
    fn drop(&mut self) {
        if let Ok(mut page) = self.page.inner.try_borrow_mut() {
            for handle in self.handles.drain(..) {
                page.orchestrator.deregister(&handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn h(id: &str) -> ElementHandle {
        ElementHandle::new(id)
    }

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn at(handle: &str, y: f64, height: f64) -> Intersection {
        Intersection {
            handle: h(handle),
            bounds: Rect::new(0.0, y, 400.0, height),
            viewport: viewport(),
        }
    }

    fn spec() -> RevealSpec {
        RevealSpec {
            threshold: 0.15,
            delay: Duration::ZERO,
            stagger: Duration::from_millis(100),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn ratio_of_partially_visible_box() {
        let report = at("a", 700.0, 200.0);
        assert!((report.ratio() - 0.5).abs() < 1e-9);
        assert!(report.meets(0.15));
    }

    #[test]
    fn zero_area_box_is_never_visible() {
        let report = at("a", 100.0, 0.0);
        assert_eq!(report.ratio(), 0.0);
        assert!(!report.meets(0.0));
    }

    #[test]
    fn box_below_viewport_is_not_visible() {
        assert!(!at("a", 2000.0, 300.0).meets(0.15));
    }

    // =========================================================================
    // State machine
    // =========================================================================

    #[test]
    fn registers_hidden_below_the_fold() {
        let mut o = Orchestrator::new();
        let state = o.register(h("a"), spec(), Some(&at("a", 1500.0, 300.0)));
        assert_eq!(state, RevealState::Hidden);
        assert!(o.is_observing(&h("a")));
    }

    #[test]
    fn element_in_initial_viewport_is_revealed_immediately() {
        let mut o = Orchestrator::new();
        let state = o.register(h("hero"), spec(), Some(&at("hero", 0.0, 600.0)));
        assert_eq!(state, RevealState::Revealed);
        assert!(!o.is_observing(&h("hero")));
        assert_eq!(o.pending(), 0);
    }

    #[test]
    fn reveal_waits_for_delay() {
        let mut o = Orchestrator::new();
        let t0 = Instant::now();
        o.register(h("a"), spec().with_delay(ms(300)), None);
        assert!(o.observe(&at("a", 100.0, 200.0), t0));
        assert!(o.advance(t0 + ms(299)).is_empty());
        assert_eq!(o.state(&h("a")), Some(RevealState::Hidden));
        assert_eq!(o.advance(t0 + ms(300)), vec![h("a")]);
        assert_eq!(o.state(&h("a")), Some(RevealState::Revealed));
    }

    #[test]
    fn below_threshold_report_does_not_schedule() {
        let mut o = Orchestrator::new();
        o.register(h("a"), spec(), None);
        // 10% visible
        assert!(!o.observe(&at("a", 780.0, 200.0), Instant::now()));
        assert_eq!(o.pending(), 0);
    }

    #[test]
    fn revealed_element_ignores_later_reports() {
        let mut o = Orchestrator::new();
        let t0 = Instant::now();
        o.register(h("a"), spec(), None);
        o.observe(&at("a", 0.0, 200.0), t0);
        assert_eq!(o.advance(t0), vec![h("a")]);

        // Scroll away and back.
        assert!(!o.observe(&at("a", 5000.0, 200.0), t0 + ms(10)));
        assert!(!o.observe(&at("a", 0.0, 200.0), t0 + ms(20)));
        assert!(o.advance(t0 + ms(1000)).is_empty());
        assert_eq!(o.state(&h("a")), Some(RevealState::Revealed));
    }

    #[test]
    fn deregister_cancels_pending_transition() {
        let mut o = Orchestrator::new();
        let t0 = Instant::now();
        o.register(h("a"), spec().with_delay(ms(500)), None);
        o.observe(&at("a", 0.0, 200.0), t0);
        assert_eq!(o.pending(), 1);
        assert!(o.deregister(&h("a")));
        assert!(o.advance(t0 + ms(1000)).is_empty());
        assert_eq!(o.state(&h("a")), None);
    }

    #[test]
    fn reports_for_unknown_handles_are_ignored() {
        let mut o = Orchestrator::new();
        assert!(!o.observe(&at("ghost", 0.0, 100.0), Instant::now()));
    }

    #[test]
    fn group_delays_stagger_in_order() {
        let mut o = Orchestrator::new();
        let handles = vec![h("a"), h("b"), h("c")];
        let delays = o.register_group(&handles, spec().with_delay(ms(50)));
        assert_eq!(delays, vec![ms(50), ms(150), ms(250)]);

        let t0 = Instant::now();
        for handle in ["c", "a", "b"] {
            o.observe(&at(handle, 0.0, 100.0), t0);
        }
        assert_eq!(o.advance(t0 + ms(1000)), vec![h("a"), h("b"), h("c")]);
    }

    proptest! {
        #[test]
        fn stagger_is_non_decreasing(n in 0usize..40, base in 0u64..500, step in 0u64..300) {
            let mut o = Orchestrator::new();
            let handles: Vec<_> = (0..n).map(|i| h(&format!("e{i}"))).collect();
            let spec = RevealSpec { threshold: 0.1, delay: ms(base), stagger: ms(step) };
            let delays = o.register_group(&handles, spec);
            prop_assert_eq!(delays.len(), n);
            for pair in delays.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        #[test]
        fn transitions_at_most_once(ops in proptest::collection::vec((0.0f64..2000.0, 0u64..400), 1..30)) {
            let mut o = Orchestrator::new();
            let t0 = Instant::now();
            o.register(h("a"), spec().with_delay(ms(100)), None);
            let mut reveals = 0;
            let mut seen_revealed = false;
            for (i, (y, dt)) in ops.iter().enumerate() {
                let now = t0 + ms(i as u64 * 50 + dt);
                o.observe(&at("a", *y, 200.0), now);
                reveals += o.advance(now).len();
                let state = o.state(&h("a"));
                if seen_revealed {
                    prop_assert_eq!(state, Some(RevealState::Revealed));
                }
                seen_revealed |= state == Some(RevealState::Revealed);
            }
            prop_assert!(reveals <= 1);
        }
    }

    // =========================================================================
    // Page mounts
    // =========================================================================

    #[test]
    fn first_paint_reveals_above_the_fold_only() {
        let page = PageReveal::new(spec(), FirstPaint::new(1280.0, 800.0));
        let mut hero = page.mount("hero");
        let top = hero.reveal("title", 600.0);
        let mut works = page.mount("work");
        let cards = works.reveal_grid("card", 6, 3, 400.0);

        assert_eq!(top.state, RevealState::Revealed);
        // First row spans 600..1000: half visible.
        assert_eq!(cards[0].state, RevealState::Revealed);
        assert_eq!(cards[3].state, RevealState::Hidden);
        assert!(cards[3].delay > cards[0].delay);
    }

    #[test]
    fn dropping_mount_deregisters_its_elements() {
        let page = PageReveal::new(spec(), FirstPaint::default());
        {
            let mut services = page.mount("services");
            services.reveal_grid("item", 4, 1, 120.0);
            let mut footer = page.mount("footer");
            footer.reveal("columns", 300.0);
            assert_eq!(page.registered(), 5);
            drop(services);
            assert_eq!(page.registered(), 1);
        }
        assert_eq!(page.registered(), 0);
    }

    #[test]
    fn skip_pushes_later_content_below_the_fold() {
        let page = PageReveal::new(spec(), FirstPaint::new(1280.0, 800.0));
        page.skip(2000.0);
        let mut mount = page.mount("late");
        assert_eq!(mount.reveal("block", 100.0).state, RevealState::Hidden);
    }

    #[test]
    fn attrs_style_carries_delay() {
        let attrs = RevealAttrs {
            handle: h("x"),
            state: RevealState::Hidden,
            delay: ms(200),
            threshold: 0.15,
        };
        assert_eq!(attrs.style(), "--reveal-delay: 200ms");
    }
}
