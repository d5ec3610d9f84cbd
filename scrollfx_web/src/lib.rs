// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrollfx.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame loop
//! - [`DomHost`]: the page (selectors, scroll metrics, removal observer)
//! - [`DomElement`]: inline style and class list writes
//!
//! [`publisher`] wires them together:
//!
//! ```rust,ignore
//! let publisher = scrollfx_web::publisher(PublisherConfig::web())?;
//! register_animation(&publisher, "#box")?
//!     .from(0.0, [("opacity", 0.0)])
//!     .to(1.0, [("opacity", 1.0)]);
//! ```

mod dom;
mod raf;

use std::rc::Rc;

use wasm_bindgen::JsValue;

pub use dom::{DomElement, DomHost, SMOOTH_SCROLL_CSS};
pub use raf::RafLoop;
pub use scrollfx_core::publisher::{Publisher, PublisherConfig};

use scrollfx_core::diagnostics::TracingSink;

/// Creates a publisher for the current page.
///
/// Diagnostics go to `tracing`; the embedding application installs the
/// subscriber.
pub fn publisher(config: PublisherConfig) -> Result<Publisher<DomHost>, JsValue> {
    let host = DomHost::new()?;
    Ok(Publisher::new(host, config, Rc::new(TracingSink), RafLoop::new))
}
