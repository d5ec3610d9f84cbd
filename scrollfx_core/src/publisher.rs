// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame scroll sampling and fan-out.
//!
//! The [`Publisher`] owns a set of [`Subscriber`]s and a [`FrameLoop`]. Each
//! frame it reads the scroll position once and hands the same percent to
//! every subscriber:
//!
//! ```text
//!   FrameLoop (tick source)
//!       │
//!       ▼
//!   Publisher::tick() ──► Host::scroll_metrics() ──► percent
//!                                                      │
//!                 ┌────────────────────────────────────┘
//!                 ▼
//!   for each Subscriber ──► Listener::listen(percent, target)
//! ```
//!
//! # Loop lifecycle
//!
//! The frame loop runs if and only if at least one subscriber exists. The
//! first [`subscribe`](Publisher::subscribe) starts it and the
//! [`unsubscribe`](Publisher::unsubscribe) that empties the set stops it.
//!
//! # Re-entrancy
//!
//! Each tick iterates a snapshot of the subscriber set. Subscribing or
//! unsubscribing from inside a tick is safe and takes effect on the next
//! tick.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::listener::Listener;
use crate::target::{Host, ScrollMetrics, Target};

/// Callback a [`FrameLoop`] invokes once per frame.
pub type FrameCallback = Box<dyn FnMut()>;

/// A per-frame tick source.
///
/// Implementations call the [`FrameCallback`] they were built with once per
/// frame while running. `start` on a running loop and `stop` on a stopped
/// loop are no-ops.
pub trait FrameLoop {
    /// Starts delivering frames.
    fn start(&self);

    /// Stops delivering frames. A frame already being delivered completes.
    fn stop(&self);

    /// Returns `true` while frames are being delivered.
    fn is_running(&self) -> bool;
}

/// What to do when the sampled percent is not finite.
///
/// This happens when the document is exactly as tall as the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NonFinitePolicy {
    /// Deliver `0.0` to every subscriber.
    #[default]
    Zero,
    /// Skip the frame; subscribers keep their last visual state.
    Skip,
}

/// Configuration for the [`Publisher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PublisherConfig {
    /// Install the document-wide smooth-scroll rule on first activation.
    pub smooth_scroll: bool,
    /// Handling of non-finite percents.
    pub non_finite: NonFinitePolicy,
}

impl PublisherConfig {
    /// Default configuration for a browser page.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            smooth_scroll: true,
            non_finite: NonFinitePolicy::Zero,
        }
    }

    /// Configuration that leaves document styles alone.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            smooth_scroll: false,
            non_finite: NonFinitePolicy::Zero,
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Identifies a subscription within one [`Publisher`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Returns the raw counter value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

/// Binds one element to one listener.
pub struct Subscriber<E> {
    id: SubscriberId,
    target: E,
    listener: Rc<RefCell<dyn Listener>>,
}

impl<E> fmt::Debug for Subscriber<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<E: Target> Subscriber<E> {
    /// This subscriber's identity.
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// The element this subscriber drives.
    #[must_use]
    pub const fn target(&self) -> &E {
        &self.target
    }

    /// Forwards `percent` to the listener.
    ///
    /// Fails with [`Diagnostic::ListenerBusy`] if the listener is already
    /// borrowed, which only happens on a re-entrant tick.
    pub fn apply(&self, percent: f64) -> Result<(), Diagnostic> {
        let mut listener = self
            .listener
            .try_borrow_mut()
            .map_err(|_| Diagnostic::ListenerBusy {
                subscriber: self.id,
            })?;
        listener.listen(percent, &self.target);
        Ok(())
    }
}

struct Shared<H: Host> {
    host: H,
    config: PublisherConfig,
    diagnostics: Rc<dyn DiagnosticSink>,
    frames: Box<dyn FrameLoop>,
    subscribers: RefCell<Vec<Rc<Subscriber<H::Element>>>>,
    next_id: Cell<u64>,
    ticks: Cell<u64>,
    smooth_installed: Cell<bool>,
    degenerate: Cell<bool>,
}

/// Samples the scroll position once per frame and fans it out.
///
/// Create one per page and pass it to
/// [`register_animation`](crate::register::register_animation) and
/// [`register_trigger`](crate::register::register_trigger). Clones share the
/// same subscriber set and frame loop.
pub struct Publisher<H: Host> {
    shared: Rc<Shared<H>>,
}

impl<H: Host> Clone for Publisher<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: Host> fmt::Debug for Publisher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = &self.shared;
        f.debug_struct("Publisher")
            .field("config", &shared.config)
            .field("subscribers", &shared.subscribers.borrow().len())
            .field("running", &shared.frames.is_running())
            .field("ticks", &shared.ticks.get())
            .finish_non_exhaustive()
    }
}

impl<H: Host + 'static> Publisher<H> {
    /// Creates a publisher with no subscribers and a stopped frame loop.
    ///
    /// `make_loop` receives the per-frame callback and returns the loop that
    /// will drive it. The callback holds only a weak reference, so dropping
    /// every `Publisher` handle tears the loop down.
    pub fn new<L, F>(
        host: H,
        config: PublisherConfig,
        diagnostics: Rc<dyn DiagnosticSink>,
        make_loop: F,
    ) -> Self
    where
        L: FrameLoop + 'static,
        F: FnOnce(FrameCallback) -> L,
    {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared<H>>| {
            let weak = weak.clone();
            let frames = make_loop(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self { shared }.tick();
                }
            }));
            Shared {
                host,
                config,
                diagnostics,
                frames: Box::new(frames),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                ticks: Cell::new(0),
                smooth_installed: Cell::new(false),
                degenerate: Cell::new(false),
            }
        });
        Self { shared }
    }

    /// Creates a publisher driven by a [`ManualFrameLoop`], returned
    /// alongside it.
    pub fn with_manual_loop(
        host: H,
        config: PublisherConfig,
        diagnostics: Rc<dyn DiagnosticSink>,
    ) -> (Self, ManualFrameLoop) {
        let frames = ManualFrameLoop::unbound();
        let publisher = Self::new(host, config, diagnostics, |callback| {
            frames.bind(callback);
            frames.clone()
        });
        (publisher, frames)
    }

    /// Adds a subscriber driving `target` with `listener`.
    ///
    /// Starts the frame loop if this is the only subscriber, and arranges for
    /// the subscription to end when `target` leaves the page.
    pub fn subscribe(&self, target: H::Element, listener: Rc<RefCell<dyn Listener>>) -> SubscriberId {
        let shared = &self.shared;
        let id = SubscriberId(shared.next_id.get());
        shared.next_id.set(id.0 + 1);

        let was_empty = {
            let mut subscribers = shared.subscribers.borrow_mut();
            let was_empty = subscribers.is_empty();
            subscribers.push(Rc::new(Subscriber {
                id,
                target: target.clone(),
                listener,
            }));
            was_empty
        };
        tracing::debug!(target: "scrollfx", ?id, "subscribed");

        if was_empty {
            self.activate();
        }

        let weak = Rc::downgrade(shared);
        shared.host.on_removed(
            id,
            &target,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self { shared }.unsubscribe(id);
                }
            }),
        );
        id
    }

    /// Removes a subscriber and its removal hook. Returns `false` if `id` was
    /// not subscribed.
    ///
    /// Stops the frame loop when the last subscriber is removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let shared = &self.shared;
        let now_empty = {
            let mut subscribers = shared.subscribers.borrow_mut();
            let Some(pos) = subscribers.iter().position(|s| s.id == id) else {
                return false;
            };
            subscribers.remove(pos);
            subscribers.is_empty()
        };
        shared.host.forget_removed(id);
        tracing::debug!(target: "scrollfx", ?id, "unsubscribed");

        if now_empty && shared.frames.is_running() {
            shared.frames.stop();
            tracing::debug!(target: "scrollfx", "frame loop stopped");
        }
        true
    }

    /// Samples the scroll position once and notifies every subscriber.
    ///
    /// Called by the frame loop; hosts may also call it directly, e.g. right
    /// after registration to avoid a frame with unstyled elements.
    pub fn tick(&self) {
        let shared = &self.shared;
        let frame = shared.ticks.get();
        shared.ticks.set(frame + 1);

        let Some(percent) = self.sample(shared.host.scroll_metrics()) else {
            return;
        };

        let snapshot: Vec<_> = shared.subscribers.borrow().clone();
        tracing::trace!(
            target: "scrollfx",
            frame,
            percent,
            subscribers = snapshot.len(),
            "tick"
        );
        for subscriber in &snapshot {
            if let Err(diagnostic) = subscriber.apply(percent) {
                shared.diagnostics.report(&diagnostic);
            }
        }
    }

    /// Whether the frame loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.frames.is_running()
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }

    /// Number of ticks run so far, including skipped ones.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.get()
    }

    /// The host page.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.shared.host
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> PublisherConfig {
        self.shared.config
    }

    /// The sink receiving this publisher's diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &Rc<dyn DiagnosticSink> {
        &self.shared.diagnostics
    }

    fn activate(&self) {
        let shared = &self.shared;
        if !shared.frames.is_running() {
            shared.frames.start();
            tracing::debug!(target: "scrollfx", "frame loop started");
        }
        if shared.config.smooth_scroll && !shared.smooth_installed.replace(true) {
            shared.host.install_smooth_scroll();
        }
    }

    /// Turns metrics into the percent delivered this frame, or `None` to skip.
    fn sample(&self, metrics: ScrollMetrics) -> Option<f64> {
        let shared = &self.shared;
        let percent = metrics.percent();
        if percent.is_finite() {
            shared.degenerate.set(false);
            return Some(percent);
        }
        if !shared.degenerate.replace(true) {
            shared.diagnostics.report(&Diagnostic::DegenerateScrollRange {
                scroll_height: metrics.scroll_height,
                viewport_height: metrics.viewport_height,
            });
        }
        match shared.config.non_finite {
            NonFinitePolicy::Zero => Some(0.0),
            NonFinitePolicy::Skip => None,
        }
    }
}

struct ManualInner {
    callback: RefCell<Option<FrameCallback>>,
    running: Cell<bool>,
    starts: Cell<u32>,
}

/// A [`FrameLoop`] advanced explicitly with [`fire`](Self::fire).
///
/// Useful for hosts without a display-driven callback and as a deterministic
/// scheduler in tests. Clones share state.
#[derive(Clone)]
pub struct ManualFrameLoop {
    inner: Rc<ManualInner>,
}

impl fmt::Debug for ManualFrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrameLoop")
            .field("running", &self.inner.running.get())
            .field("starts", &self.inner.starts.get())
            .finish_non_exhaustive()
    }
}

impl ManualFrameLoop {
    /// Creates a stopped loop that will invoke `callback` on each fired frame.
    #[must_use]
    pub fn new(callback: FrameCallback) -> Self {
        Self {
            inner: Rc::new(ManualInner {
                callback: RefCell::new(Some(callback)),
                running: Cell::new(false),
                starts: Cell::new(0),
            }),
        }
    }

    fn unbound() -> Self {
        Self {
            inner: Rc::new(ManualInner {
                callback: RefCell::new(None),
                running: Cell::new(false),
                starts: Cell::new(0),
            }),
        }
    }

    fn bind(&self, callback: FrameCallback) {
        *self.inner.callback.borrow_mut() = Some(callback);
    }

    /// Delivers one frame if running. Returns whether a frame was delivered.
    pub fn fire(&self) -> bool {
        if !self.inner.running.get() {
            return false;
        }
        // Taken out for the call so a re-entrant `fire` is a no-op, not a
        // double borrow.
        let Some(mut callback) = self.inner.callback.borrow_mut().take() else {
            return false;
        };
        callback();
        *self.inner.callback.borrow_mut() = Some(callback);
        true
    }

    /// How many times the loop went from stopped to running.
    #[must_use]
    pub fn starts(&self) -> u32 {
        self.inner.starts.get()
    }
}

impl FrameLoop for ManualFrameLoop {
    fn start(&self) {
        if !self.inner.running.replace(true) {
            self.inner.starts.set(self.inner.starts.get() + 1);
        }
    }

    fn stop(&self) {
        self.inner.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::diagnostics::CollectingSink;
    use crate::testing::{FakeElement, FakeHost};
    use crate::trigger::Trigger;

    fn setup(config: PublisherConfig) -> (Publisher<FakeHost>, ManualFrameLoop, FakeHost, Rc<CollectingSink>) {
        let host = FakeHost::new();
        let sink = Rc::new(CollectingSink::new());
        let (publisher, frames) = Publisher::with_manual_loop(host.clone(), config, sink.clone());
        (publisher, frames, host, sink)
    }

    fn fade(sink: &Rc<CollectingSink>) -> Animation {
        let anim = Animation::new(sink.clone());
        anim.from(0.0, [("opacity", 0.0)]).to(1.0, [("opacity", 1.0)]);
        anim
    }

    #[test]
    fn loop_runs_iff_subscribed() {
        let (publisher, frames, _, sink) = setup(PublisherConfig::web());
        assert!(!publisher.is_running(), "idle before first subscribe");

        let anim = fade(&sink);
        let a = publisher.subscribe(FakeElement::default(), anim.listener());
        let b = publisher.subscribe(FakeElement::default(), anim.listener());
        assert!(publisher.is_running(), "started by first subscribe");
        assert_eq!(frames.starts(), 1, "started once");

        assert!(publisher.unsubscribe(a));
        assert!(publisher.is_running(), "one subscriber left");
        assert!(publisher.unsubscribe(b));
        assert!(!publisher.is_running(), "stopped by last unsubscribe");
        assert!(!frames.fire(), "no frames after stop");

        assert!(!publisher.unsubscribe(b), "second unsubscribe is a no-op");
    }

    #[test]
    fn smooth_scroll_rule_is_installed_once() {
        let (publisher, _, host, sink) = setup(PublisherConfig::web());
        let anim = fade(&sink);
        let id = publisher.subscribe(FakeElement::default(), anim.listener());
        publisher.unsubscribe(id);
        publisher.subscribe(FakeElement::default(), anim.listener());
        assert_eq!(host.smooth_installs(), 1);

        let (publisher, _, host, sink) = setup(PublisherConfig::headless());
        publisher.subscribe(FakeElement::default(), fade(&sink).listener());
        assert_eq!(host.smooth_installs(), 0, "disabled by config");
    }

    #[test]
    fn every_subscriber_sees_the_same_percent() {
        let (publisher, frames, host, sink) = setup(PublisherConfig::web());
        let anim = fade(&sink);
        let els: Vec<_> = (0..3).map(|_| FakeElement::default()).collect();
        for el in &els {
            publisher.subscribe(el.clone(), anim.listener());
        }

        host.scroll_to_percent(0.25);
        assert!(frames.fire());
        for el in &els {
            assert_eq!(el.style("opacity").as_deref(), Some("0.25"));
        }
        assert_eq!(publisher.ticks(), 1);
    }

    #[test]
    fn percent_is_sampled_fresh_each_tick() {
        let (publisher, frames, host, sink) = setup(PublisherConfig::web());
        let el = FakeElement::default();
        publisher.subscribe(el.clone(), fade(&sink).listener());

        host.scroll_to_percent(0.5);
        frames.fire();
        assert_eq!(el.style("opacity").as_deref(), Some("0.5"));
        host.scroll_to_percent(0.75);
        frames.fire();
        assert_eq!(el.style("opacity").as_deref(), Some("0.75"));
    }

    #[test]
    fn unsubscribe_drops_the_removal_hook() {
        let (publisher, _, host, sink) = setup(PublisherConfig::web());
        let anim = fade(&sink);
        let el = FakeElement::default();
        for _ in 0..100 {
            let id = publisher.subscribe(el.clone(), anim.listener());
            assert_eq!(host.removal_hooks(), 1, "one hook per live subscription");
            publisher.unsubscribe(id);
        }
        assert_eq!(host.removal_hooks(), 0, "no hooks outlive their subscription");
    }

    #[test]
    fn detached_element_is_unsubscribed_at_once() {
        let (publisher, _, host, sink) = setup(PublisherConfig::web());
        let el = host.insert(".gone", FakeElement::default());
        host.remove(&el);

        let id = publisher.subscribe(el, fade(&sink).listener());
        assert_eq!(publisher.subscriber_count(), 0, "already off the page");
        assert!(!publisher.is_running(), "loop stopped again");
        assert_eq!(host.removal_hooks(), 0);
        assert!(!publisher.unsubscribe(id), "nothing left to remove");
    }

    #[test]
    fn removal_unsubscribes() {
        let (publisher, _, host, sink) = setup(PublisherConfig::web());
        let el = FakeElement::default();
        publisher.subscribe(el.clone(), fade(&sink).listener());
        assert_eq!(publisher.subscriber_count(), 1);

        host.remove(&el);
        assert_eq!(publisher.subscriber_count(), 0);
        assert!(!publisher.is_running(), "removal of the last element stops the loop");
    }

    /// Unsubscribes a fixed subscriber, then subscribes another, on its first
    /// call.
    struct Churn {
        publisher: Publisher<FakeHost>,
        victim: Option<SubscriberId>,
        added: Option<SubscriberId>,
        calls: u32,
    }

    impl Listener for Churn {
        fn listen(&mut self, _percent: f64, _target: &dyn Target) {
            self.calls += 1;
            if let Some(victim) = self.victim.take() {
                self.publisher.unsubscribe(victim);
                let extra = Trigger::new();
                self.added = Some(
                    self.publisher
                        .subscribe(FakeElement::default(), extra.listener()),
                );
            }
        }
    }

    #[test]
    fn mutation_during_a_tick_applies_next_tick() {
        let (publisher, frames, _, sink) = setup(PublisherConfig::web());
        let anim = fade(&sink);
        let churn = Rc::new(RefCell::new(Churn {
            publisher: publisher.clone(),
            victim: None,
            added: None,
            calls: 0,
        }));
        publisher.subscribe(FakeElement::default(), churn.clone());
        let victim_el = FakeElement::default();
        let victim = publisher.subscribe(victim_el.clone(), anim.listener());
        churn.borrow_mut().victim = Some(victim);

        frames.fire();
        assert_eq!(
            victim_el.writes().len(),
            1,
            "unsubscribed mid-tick but still in this tick's snapshot"
        );
        assert_eq!(publisher.subscriber_count(), 2, "churn plus the added trigger");

        frames.fire();
        assert_eq!(victim_el.writes().len(), 1, "gone on the next tick");
        assert_eq!(churn.borrow().calls, 2);
        assert!(churn.borrow().added.is_some(), "subscribed from inside listen");
        assert!(sink.reported().is_empty(), "no diagnostics: {:?}", sink.reported());
    }

    #[test]
    fn busy_listener_is_skipped_without_starving_others() {
        let (publisher, frames, _, sink) = setup(PublisherConfig::web());
        let busy = fade(&sink);
        let ok = fade(&sink);
        let busy_el = FakeElement::default();
        let ok_el = FakeElement::default();
        let busy_id = publisher.subscribe(busy_el.clone(), busy.listener());
        publisher.subscribe(ok_el.clone(), ok.listener());

        let listener = busy.listener();
        let _held = listener.borrow_mut();
        frames.fire();

        assert!(busy_el.writes().is_empty(), "skipped");
        assert_eq!(ok_el.writes().len(), 1, "still ticked");
        assert_eq!(
            sink.reported(),
            [Diagnostic::ListenerBusy {
                subscriber: busy_id
            }]
        );
    }

    #[test]
    fn degenerate_range_clamps_to_zero_and_reports_once() {
        let (publisher, frames, host, sink) = setup(PublisherConfig::web());
        host.set_metrics(ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 900.0,
            viewport_height: 900.0,
        });
        let anim = Animation::new(sink.clone());
        anim.from(0.0, [("opacity", 0.3)]).to(1.0, [("opacity", 1.0)]);
        let el = FakeElement::default();
        publisher.subscribe(el.clone(), anim.listener());

        frames.fire();
        frames.fire();
        assert_eq!(el.style("opacity").as_deref(), Some("0.3"));
        assert_eq!(
            sink.reported(),
            [Diagnostic::DegenerateScrollRange {
                scroll_height: 900.0,
                viewport_height: 900.0,
            }],
            "reported once per degenerate stretch"
        );
    }

    #[test]
    fn degenerate_range_can_skip_the_tick() {
        let config = PublisherConfig {
            non_finite: NonFinitePolicy::Skip,
            ..PublisherConfig::headless()
        };
        let (publisher, frames, host, sink) = setup(config);
        host.set_metrics(ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 500.0,
            viewport_height: 500.0,
        });
        let el = FakeElement::default();
        publisher.subscribe(el.clone(), fade(&sink).listener());

        frames.fire();
        assert!(el.writes().is_empty(), "tick skipped");
        assert_eq!(publisher.ticks(), 1, "skipped ticks still count");
    }

    #[test]
    fn dropping_the_publisher_disarms_the_loop_callback() {
        let (publisher, frames, _, sink) = setup(PublisherConfig::web());
        let el = FakeElement::default();
        publisher.subscribe(el.clone(), fade(&sink).listener());
        drop(publisher);
        assert!(frames.fire(), "loop handle outlives the publisher");
        assert!(el.writes().is_empty(), "callback found no publisher");
    }
}
