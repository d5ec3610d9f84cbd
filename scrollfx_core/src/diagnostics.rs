// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for rejected input and degraded sampling.
//!
//! Nothing in the engine fails silently. Every rejected input (an unknown
//! selector, style property, or easing name) and every degraded frame (a
//! non-scrollable page, a busy listener) is described by a [`Diagnostic`] and
//! handed to a [`DiagnosticSink`]. None of them abort the frame loop.
//!
//! [`TracingSink`] is the default sink and forwards to `tracing`.
//! [`CollectingSink`] keeps diagnostics in memory for inspection.

use std::cell::RefCell;

use crate::publisher::SubscriberId;

/// Something the engine rejected or had to work around.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    /// A selector matched zero elements.
    #[error("scroll effects could not find any element with the selector '{selector}'")]
    SelectorNotFound {
        /// The selector as given by the caller.
        selector: String,
    },
    /// A style key outside the fixed property whitelist.
    #[error("scroll effects have no support for the style property '{name}'")]
    UnsupportedStyleProperty {
        /// The rejected key.
        name: String,
    },
    /// An easing name outside the fixed set.
    #[error("unknown easing '{name}' (expected linear, easeIn, easeOut or easeInOut)")]
    UnknownEasing {
        /// The rejected name.
        name: String,
    },
    /// The document cannot scroll, so the sampled percent is not finite.
    #[error(
        "document is not scrollable (scroll height {scroll_height}, viewport height {viewport_height})"
    )]
    DegenerateScrollRange {
        /// Total scrollable height of the document.
        scroll_height: f64,
        /// Height of the viewport.
        viewport_height: f64,
    },
    /// A listener was already borrowed when its subscriber was ticked.
    #[error("listener for {subscriber:?} is busy; skipped for this frame")]
    ListenerBusy {
        /// The subscriber that was skipped.
        subscriber: SubscriberId,
    },
}

/// Receives diagnostics from the publisher, its listeners and registration.
///
/// Methods take `&self`; sinks that keep state use interior mutability.
pub trait DiagnosticSink {
    /// Reports a diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
///
/// Rejected caller input is logged at `error`, degraded frames at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::SelectorNotFound { .. }
            | Diagnostic::UnsupportedStyleProperty { .. }
            | Diagnostic::UnknownEasing { .. } => {
                tracing::error!(target: "scrollfx", "{diagnostic}");
            }
            Diagnostic::DegenerateScrollRange { .. } | Diagnostic::ListenerBusy { .. } => {
                tracing::warn!(target: "scrollfx", "{diagnostic}");
            }
        }
    }
}

/// Keeps every reported diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reported: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far, oldest first.
    #[must_use]
    pub fn reported(&self) -> Vec<Diagnostic> {
        self.reported.borrow().clone()
    }

    /// Removes and returns everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.reported.take()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.reported.borrow_mut().push(diagnostic.clone());
    }
}
