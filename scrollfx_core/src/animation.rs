// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous style interpolation over a scroll range.
//!
//! An [`Animation`] interpolates the properties configured through
//! [`from`](Animation::from) and [`to`](Animation::to) between two scroll
//! percents. Those properties form the *volatile* set; everything else is
//! never written.
//!
//! ```rust,ignore
//! register_animation(&publisher, "#box")?
//!     .from(0.0, [("opacity", 0.0), ("translateY", 40.0)])
//!     .to(0.5, [("opacity", 1.0), ("translateY", 0.0)])
//!     .using(Options::new(Easing::EaseOut));
//! ```
//!
//! Configuration is not snapshotted. Every subscriber reads the current
//! state at each tick, so calls made after registration take effect on the
//! next frame. This is sound only because ticks and configuration run on
//! the same thread.

use std::cell::RefCell;
use std::rc::Rc;

use crate::diagnostics::DiagnosticSink;
use crate::easing::Options;
use crate::listener::Listener;
use crate::style::{PropertySet, Style, parse_entries};
use crate::target::Target;

/// Shared state behind an [`Animation`] handle.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    range_start: f64,
    range_end: f64,
    from_style: Style,
    to_style: Style,
    volatile: PropertySet,
    options: Options,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            range_start: 0.0,
            range_end: 1.0,
            from_style: Style::default(),
            to_style: Style::default(),
            volatile: PropertySet::EMPTY,
            options: Options::default(),
        }
    }
}

impl AnimationState {
    /// Progress through the range, clamped to `[0, 1]`.
    ///
    /// A degenerate range (`end <= start`) is a step at `end`. Non-finite
    /// input is treated as 0.
    #[must_use]
    pub fn relative(&self, percent: f64) -> f64 {
        let percent = if percent.is_finite() { percent } else { 0.0 };
        let span = self.range_end - self.range_start;
        if span <= 0.0 || !span.is_finite() {
            return if percent >= self.range_end { 1.0 } else { 0.0 };
        }
        ((percent - self.range_start) / span).clamp(0.0, 1.0)
    }

    /// The interpolated style at `percent`.
    ///
    /// Only volatile properties differ from [`Style::default`].
    #[must_use]
    pub fn current_style(&self, percent: f64) -> Style {
        let eased = self.options.easing.apply(self.relative(percent));
        let mut style = Style::default();
        for property in self.volatile.iter() {
            let from = self.from_style.get(property);
            let to = self.to_style.get(property);
            style.set(property, from + (to - from) * eased);
        }
        style
    }

    /// Range start and end percents.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// The properties this animation writes.
    #[must_use]
    pub const fn volatile(&self) -> PropertySet {
        self.volatile
    }

    /// The configured options.
    #[must_use]
    pub const fn options(&self) -> Options {
        self.options
    }
}

impl Listener for AnimationState {
    fn listen(&mut self, percent: f64, target: &dyn Target) {
        if self.volatile.is_empty() {
            return;
        }
        self.current_style(percent).apply_to(target, self.volatile);
    }
}

/// Fluent handle to a scroll-driven animation.
///
/// Clones share the same state. Builder methods take `&self` and return
/// `&Self` so calls chain off the value returned by registration.
#[derive(Clone)]
pub struct Animation {
    state: Rc<RefCell<AnimationState>>,
    diagnostics: Rc<dyn DiagnosticSink>,
}

impl core::fmt::Debug for Animation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Animation")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Animation {
    /// Creates an unconfigured animation spanning `[0, 1]` with linear
    /// easing. Rejected style keys are reported to `diagnostics`.
    #[must_use]
    pub fn new(diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            state: Rc::new(RefCell::new(AnimationState::default())),
            diagnostics,
        }
    }

    /// Sets the range start and the style at that point.
    ///
    /// Keys outside the property whitelist are reported and dropped; the
    /// remaining keys become volatile.
    pub fn from<K, I>(&self, percent: f64, style: I) -> &Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let entries = parse_entries(style, &*self.diagnostics);
        let mut state = self.state.borrow_mut();
        state.range_start = percent;
        for (property, value) in entries {
            state.from_style.set(property, value);
            state.volatile.insert(property);
        }
        self
    }

    /// Sets the range end and the style at that point.
    ///
    /// Same key handling as [`from`](Self::from).
    pub fn to<K, I>(&self, percent: f64, style: I) -> &Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let entries = parse_entries(style, &*self.diagnostics);
        let mut state = self.state.borrow_mut();
        state.range_end = percent;
        for (property, value) in entries {
            state.to_style.set(property, value);
            state.volatile.insert(property);
        }
        self
    }

    /// Replaces the options.
    pub fn using(&self, options: Options) -> &Self {
        self.state.borrow_mut().options = options;
        self
    }

    /// A copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> AnimationState {
        self.state.borrow().clone()
    }

    /// The interpolated style at `percent` under the current configuration.
    #[must_use]
    pub fn current_style(&self, percent: f64) -> Style {
        self.state.borrow().current_style(percent)
    }

    /// The shared state as a listener, for
    /// [`Publisher::subscribe`](crate::publisher::Publisher::subscribe).
    #[must_use]
    pub fn listener(&self) -> Rc<RefCell<dyn Listener>> {
        self.state.clone()
    }
}
