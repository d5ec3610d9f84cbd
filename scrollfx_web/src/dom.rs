// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The browser page as a [`Host`].
//!
//! [`DomHost`] resolves selectors with `querySelectorAll`, reads scroll state
//! from `window` and `document.body`, and watches the body with one
//! `MutationObserver` so subscriptions end when their element is removed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MutationObserver, MutationObserverInit, Window};

use scrollfx_core::publisher::SubscriberId;
use scrollfx_core::target::{Host, ScrollMetrics, Target};

/// Stylesheet installed by [`Host::install_smooth_scroll`].
pub const SMOOTH_SCROLL_CSS: &str = "html,body{scroll-behavior:smooth;}";

/// An element driven by scroll effects.
///
/// Style and class writes that the DOM rejects are dropped.
#[derive(Clone, Debug)]
pub struct DomElement(HtmlElement);

impl DomElement {
    /// Wraps an element.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        Self(element)
    }

    /// The underlying element.
    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.0
    }
}

impl Target for DomElement {
    fn set_style_property(&self, name: &str, value: &str) {
        let _ = self.0.style().set_property(name, value);
    }

    fn add_class(&self, name: &str) {
        let _ = self.0.class_list().add_1(name);
    }

    fn remove_class(&self, name: &str) {
        let _ = self.0.class_list().remove_1(name);
    }
}

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

type RemovalHook = (SubscriberId, HtmlElement, Box<dyn FnOnce()>);

struct DomInner {
    window: Window,
    document: Document,
    removal_hooks: RefCell<Vec<RemovalHook>>,
    observer: RefCell<Option<(MutationObserver, ObserverClosure)>>,
}

impl DomInner {
    /// Runs and forgets the hooks of every element no longer in the document.
    fn flush_removed(&self) {
        let fired: Vec<_> = {
            let mut hooks = self.removal_hooks.borrow_mut();
            let (fired, kept) = hooks.drain(..).partition(|(_, el, _)| !el.is_connected());
            *hooks = kept;
            fired
        };
        if !fired.is_empty() {
            tracing::debug!(target: "scrollfx", removed = fired.len(), "elements left the page");
        }
        for (_, _, hook) in fired {
            hook();
        }
    }
}

impl Drop for DomInner {
    fn drop(&mut self) {
        if let Some((observer, _closure)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
    }
}

/// The current browser page.
///
/// Clones share the same removal observer.
#[derive(Clone)]
pub struct DomHost {
    inner: Rc<DomInner>,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("removal_hooks", &self.inner.removal_hooks.borrow().len())
            .field("observing", &self.inner.observer.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl DomHost {
    /// Binds to the global `window` and its document.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            inner: Rc::new(DomInner {
                window,
                document,
                removal_hooks: RefCell::new(Vec::new()),
                observer: RefCell::new(None),
            }),
        })
    }

    /// The bound document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Starts the body observer if it is not running yet.
    fn observe(&self) -> Result<(), JsValue> {
        if self.inner.observer.borrow().is_some() {
            return Ok(());
        }
        let body = self
            .inner
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let weak: Weak<DomInner> = Rc::downgrade(&self.inner);
        let closure: ObserverClosure = Closure::wrap(Box::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                if let Some(inner) = weak.upgrade() {
                    inner.flush_removed();
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;

        *self.inner.observer.borrow_mut() = Some((observer, closure));
        Ok(())
    }

    fn install_style(&self, css: &str) -> Result<(), JsValue> {
        let document = &self.inner.document;
        let head = document
            .head()
            .ok_or_else(|| JsValue::from_str("document has no head"))?;
        let style = document.create_element("style")?;
        style.set_text_content(Some(css));
        head.append_child(&style)?;
        Ok(())
    }
}

impl Host for DomHost {
    type Element = DomElement;

    fn query_all(&self, selector: &str) -> Vec<DomElement> {
        let list = match self.inner.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(target: "scrollfx", selector, ?err, "invalid selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(DomElement)
            .collect()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let window = &self.inner.window;
        metrics(
            window.scroll_y().ok(),
            self.inner.document.body().map(|b| b.scroll_height()),
            window.inner_height().ok().and_then(|h| h.as_f64()),
        )
    }

    fn bounding_rect(&self, element: &DomElement) -> Rect {
        let r = element.0.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn on_removed(&self, subscriber: SubscriberId, element: &DomElement, callback: Box<dyn FnOnce()>) {
        // The observer only reports later mutations.
        if !element.0.is_connected() {
            tracing::debug!(target: "scrollfx", ?subscriber, "element already detached");
            callback();
            return;
        }
        self.inner
            .removal_hooks
            .borrow_mut()
            .push((subscriber, element.0.clone(), callback));
        if let Err(err) = self.observe() {
            tracing::warn!(target: "scrollfx", ?err, "removal observer unavailable");
        }
    }

    fn forget_removed(&self, subscriber: SubscriberId) {
        self.inner
            .removal_hooks
            .borrow_mut()
            .retain(|(id, _, _)| *id != subscriber);
    }

    fn install_smooth_scroll(&self) {
        if let Err(err) = self.install_style(SMOOTH_SCROLL_CSS) {
            tracing::warn!(target: "scrollfx", ?err, "smooth scroll rule not installed");
        }
    }
}

/// Builds metrics from raw DOM readings. Missing readings count as zero.
fn metrics(scroll_y: Option<f64>, body_height: Option<i32>, inner_height: Option<f64>) -> ScrollMetrics {
    ScrollMetrics {
        scroll_y: scroll_y.unwrap_or(0.0),
        scroll_height: body_height.map_or(0.0, f64::from),
        viewport_height: inner_height.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_from_readings() {
        let m = metrics(Some(300.0), Some(2600), Some(600.0));
        assert_eq!(m.percent(), 0.15, "300 / (2600 - 600)");
    }

    #[test]
    fn missing_readings_are_zero() {
        let m = metrics(None, None, None);
        assert_eq!(m, ScrollMetrics::default());
        assert!(!m.percent().is_finite(), "left to the publisher's policy");
    }

    #[test]
    fn smooth_scroll_rule_covers_html_and_body() {
        assert!(SMOOTH_SCROLL_CSS.starts_with("html,body{"), "selector list");
        assert!(SMOOTH_SCROLL_CSS.contains("scroll-behavior:smooth"), "declaration");
    }
}
