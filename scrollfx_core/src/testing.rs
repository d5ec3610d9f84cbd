// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host and elements for tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::Rect;

use crate::publisher::SubscriberId;
use crate::style::Style;
use crate::target::{Host, ScrollMetrics, Target};

/// A class-list edit recorded by [`FakeElement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ClassOp {
    Add(String),
    Remove(String),
}

#[derive(Debug, Default)]
struct ElementState {
    writes: RefCell<Vec<(String, String)>>,
    classes: RefCell<Vec<String>>,
    class_ops: RefCell<Vec<ClassOp>>,
    rect: Cell<Rect>,
    detached: Cell<bool>,
}

/// An element that records every write. Clones share state.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeElement(Rc<ElementState>);

impl FakeElement {
    pub(crate) fn with_rect(rect: Rect) -> Self {
        let el = Self::default();
        el.0.rect.set(rect);
        el
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Every style write, oldest first.
    pub(crate) fn writes(&self) -> Vec<(String, String)> {
        self.0.writes.borrow().clone()
    }

    /// The latest value written to `name`.
    pub(crate) fn style(&self, name: &str) -> Option<String> {
        self.0
            .writes
            .borrow()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub(crate) fn has_class(&self, name: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == name)
    }

    pub(crate) fn class_ops(&self) -> Vec<ClassOp> {
        self.0.class_ops.borrow().clone()
    }

    /// Reconstructs a [`Style`] from the latest `opacity` and `transform`
    /// writes. Properties that were never written keep their defaults.
    pub(crate) fn read_back(&self) -> Style {
        let mut style = Style::default();
        if let Some(opacity) = self.style("opacity") {
            style.opacity = opacity.parse().expect("numeric opacity");
        }
        if let Some(transform) = self.style("transform") {
            for component in transform.split_whitespace() {
                let (name, rest) = component.split_once('(').expect("function syntax");
                let value: f64 = rest
                    .trim_end_matches(')')
                    .trim_end_matches("px")
                    .parse()
                    .expect("numeric argument");
                let property = name.parse().expect("known transform component");
                style.set(property, value);
            }
        }
        style
    }
}

impl Target for FakeElement {
    fn set_style_property(&self, name: &str, value: &str) {
        self.0.writes.borrow_mut().push((name.into(), value.into()));
    }

    fn add_class(&self, name: &str) {
        self.0.class_ops.borrow_mut().push(ClassOp::Add(name.into()));
        let mut classes = self.0.classes.borrow_mut();
        if !classes.iter().any(|c| c == name) {
            classes.push(name.into());
        }
    }

    fn remove_class(&self, name: &str) {
        self.0
            .class_ops
            .borrow_mut()
            .push(ClassOp::Remove(name.into()));
        self.0.classes.borrow_mut().retain(|c| c != name);
    }
}

#[derive(Default)]
struct HostState {
    elements: RefCell<BTreeMap<String, Vec<FakeElement>>>,
    metrics: Cell<ScrollMetrics>,
    removal_hooks: RefCell<Vec<(SubscriberId, FakeElement, Box<dyn FnOnce()>)>>,
    smooth_installs: Cell<u32>,
}

/// A page with a fixed set of selectors. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct FakeHost(Rc<HostState>);

impl core::fmt::Debug for FakeHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FakeHost")
            .field("metrics", &self.0.metrics.get())
            .field("removal_hooks", &self.0.removal_hooks.borrow().len())
            .finish_non_exhaustive()
    }
}

impl FakeHost {
    /// A 2000px document in a 1000px viewport, scrolled to the top.
    pub(crate) fn new() -> Self {
        let host = Self::default();
        host.set_metrics(ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 2000.0,
            viewport_height: 1000.0,
        });
        host
    }

    pub(crate) fn insert(&self, selector: &str, element: FakeElement) -> FakeElement {
        self.0
            .elements
            .borrow_mut()
            .entry(selector.into())
            .or_default()
            .push(element.clone());
        element
    }

    pub(crate) fn set_metrics(&self, metrics: ScrollMetrics) {
        self.0.metrics.set(metrics);
    }

    /// Scrolls so that the sampled percent equals `percent`.
    pub(crate) fn scroll_to_percent(&self, percent: f64) {
        let mut m = self.0.metrics.get();
        m.scroll_y = percent * m.max_scroll();
        self.0.metrics.set(m);
    }

    /// Removes `element` from the page, firing its removal hooks.
    pub(crate) fn remove(&self, element: &FakeElement) {
        element.0.detached.set(true);
        for matched in self.0.elements.borrow_mut().values_mut() {
            matched.retain(|e| !e.same_as(element));
        }
        let fired = {
            let mut hooks = self.0.removal_hooks.borrow_mut();
            let (fired, kept): (Vec<_>, Vec<_>) =
                hooks.drain(..).partition(|(_, e, _)| e.same_as(element));
            *hooks = kept;
            fired
        };
        for (_, _, hook) in fired {
            hook();
        }
    }

    /// Number of pending removal hooks.
    pub(crate) fn removal_hooks(&self) -> usize {
        self.0.removal_hooks.borrow().len()
    }

    pub(crate) fn smooth_installs(&self) -> u32 {
        self.0.smooth_installs.get()
    }
}

impl Host for FakeHost {
    type Element = FakeElement;

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.0
            .elements
            .borrow()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.0.metrics.get()
    }

    fn bounding_rect(&self, element: &FakeElement) -> Rect {
        element.0.rect.get()
    }

    fn on_removed(&self, subscriber: SubscriberId, element: &FakeElement, callback: Box<dyn FnOnce()>) {
        if element.0.detached.get() {
            callback();
            return;
        }
        self.0
            .removal_hooks
            .borrow_mut()
            .push((subscriber, element.clone(), callback));
    }

    fn forget_removed(&self, subscriber: SubscriberId) {
        self.0
            .removal_hooks
            .borrow_mut()
            .retain(|(id, _, _)| *id != subscriber);
    }

    fn install_smooth_scroll(&self) {
        self.0.smooth_installs.set(self.0.smooth_installs.get() + 1);
    }
}
