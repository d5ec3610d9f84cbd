// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame loop.
//!
//! [`RafLoop`] calls its [`FrameCallback`] once per browser animation frame
//! while running. It is the [`FrameLoop`] the web [`Publisher`] is built
//! with, so it starts on the first subscription and stops after the last.
//!
//! [`Publisher`]: scrollfx_core::publisher::Publisher

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scrollfx_core::publisher::{FrameCallback, FrameLoop};

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// lookup happens per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Created on first start and reused afterwards, so a `start` issued from
    /// inside a frame never replaces the closure that is executing.
    closure: RefCell<Option<RafClosure>>,

    /// The per-frame callback.
    callback: RefCell<FrameCallback>,

    /// Frames delivered so far.
    frame_counter: Cell<u64>,

    /// Whether the loop is currently running.
    running: Cell<bool>,

    /// The ID of the outstanding `requestAnimationFrame` request, if any.
    pending: Cell<Option<i32>>,
}

impl RafInner {
    /// Requests the next frame unless one is already outstanding.
    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        if let Some(ref closure) = *self.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.pending.set(Some(id));
        }
    }

    fn on_frame(&self) {
        self.pending.set(None);
        if !self.running.get() {
            return;
        }
        let frame = self.frame_counter.get();
        self.frame_counter.set(frame + 1);

        // The callback may stop and restart the loop; `request` below sees
        // the final state.
        (self.callback.borrow_mut())();

        if self.running.get() {
            self.request();
        }
    }
}

/// A `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`]; the loop is idle until
/// [`start`](FrameLoop::start). Dropping the loop cancels any outstanding
/// frame.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    #[must_use]
    pub fn new(callback: FrameCallback) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(callback),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                pending: Cell::new(None),
            }),
        }
    }

    /// Frames delivered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.frame_counter.get()
    }

    fn ensure_closure(&self) {
        let mut slot = self.inner.closure.borrow_mut();
        if slot.is_some() {
            return;
        }
        let weak: Weak<RafInner> = Rc::downgrade(&self.inner);
        *slot = Some(Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame();
            }
        }) as Box<dyn FnMut(f64)>));
    }
}

impl FrameLoop for RafLoop {
    fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }
        self.ensure_closure();
        self.inner.request();
    }

    fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        if let Some(id) = self.inner.pending.take() {
            cancel_animation_frame(id);
        }
    }

    fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("pending", &self.inner.pending.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish_non_exhaustive()
    }
}
