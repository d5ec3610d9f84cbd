// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot class toggling at scroll thresholds.
//!
//! A [`Trigger`] has two independent thresholds. Crossing the `after`
//! threshold (`percent >= t`) adds the apply-classes and removes the
//! remove-classes; crossing the `before` threshold (`percent <= t`) does the
//! mirror image. Each threshold fires once and is then [`Threshold::Consumed`]
//! until re-armed by calling [`Trigger::after`] or [`Trigger::before`] again.
//! Thresholds are tracked per element, so every element matched by one
//! registration fires on its own.
//!
//! Within one `listen` call the `after` check runs first and the `before`
//! check second, so a jump that satisfies both leaves the `before` action's
//! class state in place.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::listener::Listener;
use crate::target::Target;

/// State of one trigger threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Threshold {
    /// Never configured.
    #[default]
    Unset,
    /// Waiting to be crossed at the given percent.
    Armed(f64),
    /// Crossed and acted upon.
    Consumed,
}

impl Threshold {
    /// Fires if armed and `crossed` holds for the armed value, consuming the
    /// threshold. Returns whether it fired.
    fn fire_if(&mut self, crossed: impl FnOnce(f64) -> bool) -> bool {
        match *self {
            Self::Armed(t) if crossed(t) => {
                *self = Self::Consumed;
                true
            }
            _ => false,
        }
    }
}

/// Shared state behind a [`Trigger`] handle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriggerState {
    after: Threshold,
    before: Threshold,
    classes_to_apply: Vec<String>,
    classes_to_remove: Vec<String>,
}

impl TriggerState {
    /// The `after` threshold.
    #[must_use]
    pub const fn after(&self) -> Threshold {
        self.after
    }

    /// The `before` threshold.
    #[must_use]
    pub const fn before(&self) -> Threshold {
        self.before
    }

    /// Classes added when `after` fires, in configuration order.
    #[must_use]
    pub fn classes_to_apply(&self) -> &[String] {
        &self.classes_to_apply
    }

    /// Classes removed when `after` fires, in configuration order.
    #[must_use]
    pub fn classes_to_remove(&self) -> &[String] {
        &self.classes_to_remove
    }

    /// Returns `true` once no threshold is armed.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        !matches!(self.after, Threshold::Armed(_)) && !matches!(self.before, Threshold::Armed(_))
    }
}

impl Listener for TriggerState {
    fn listen(&mut self, percent: f64, target: &dyn Target) {
        if !percent.is_finite() {
            return;
        }
        if self.after.fire_if(|t| percent >= t) {
            for class in &self.classes_to_apply {
                target.add_class(class);
            }
            for class in &self.classes_to_remove {
                target.remove_class(class);
            }
        }
        if self.before.fire_if(|t| percent <= t) {
            for class in &self.classes_to_apply {
                target.remove_class(class);
            }
            for class in &self.classes_to_remove {
                target.add_class(class);
            }
        }
    }
}

#[derive(Default)]
struct TriggerShared {
    /// Configuration handed to elements subscribed later.
    template: TriggerState,
    /// Per-element states, in subscription order.
    elements: Vec<Weak<RefCell<TriggerState>>>,
}

/// Fluent handle to a scroll trigger. Clones share the same configuration.
///
/// Each subscribed element gets its own [`TriggerState`], so a threshold
/// consumed on one element stays armed on the others. Configuration calls
/// apply to every element, including ones subscribed earlier.
#[derive(Clone, Default)]
pub struct Trigger {
    shared: Rc<RefCell<TriggerShared>>,
}

impl core::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Trigger")
            .field("template", &shared.template)
            .field("elements", &shared.elements.len())
            .finish()
    }
}

impl Trigger {
    /// Creates a trigger with no thresholds and no classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the `after` threshold at `percent`.
    pub fn after(&self, percent: f64) -> &Self {
        self.configure(|state| state.after = Threshold::Armed(percent))
    }

    /// Arms the `before` threshold at `percent`.
    pub fn before(&self, percent: f64) -> &Self {
        self.configure(|state| state.before = Threshold::Armed(percent))
    }

    /// Appends a class added on `after` and removed on `before`.
    pub fn apply_class(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        self.configure(|state| state.classes_to_apply.push(name.clone()))
    }

    /// Appends a class removed on `after` and added on `before`.
    pub fn remove_class(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        self.configure(|state| state.classes_to_remove.push(name.clone()))
    }

    /// A copy of the configuration new elements start from.
    #[must_use]
    pub fn snapshot(&self) -> TriggerState {
        self.shared.borrow().template.clone()
    }

    /// Copies of the live per-element states, in subscription order.
    #[must_use]
    pub fn element_states(&self) -> Vec<TriggerState> {
        self.shared
            .borrow()
            .elements
            .iter()
            .filter_map(Weak::upgrade)
            .map(|state| state.borrow().clone())
            .collect()
    }

    /// A fresh per-element state as a listener, for
    /// [`Publisher::subscribe`](crate::publisher::Publisher::subscribe).
    ///
    /// Call once per subscribed element.
    #[must_use]
    pub fn listener(&self) -> Rc<RefCell<dyn Listener>> {
        let mut shared = self.shared.borrow_mut();
        let state = Rc::new(RefCell::new(shared.template.clone()));
        shared.elements.retain(|weak| weak.strong_count() > 0);
        shared.elements.push(Rc::downgrade(&state));
        state
    }

    fn configure(&self, edit: impl Fn(&mut TriggerState)) -> &Self {
        let mut shared = self.shared.borrow_mut();
        edit(&mut shared.template);
        shared.elements.retain(|weak| weak.strong_count() > 0);
        for state in shared.elements.iter().filter_map(Weak::upgrade) {
            edit(&mut *state.borrow_mut());
        }
        self
    }
}
