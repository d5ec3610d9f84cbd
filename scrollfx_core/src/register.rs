// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector-based registration and element geometry.
//!
//! Registration resolves a selector once, creates one effect handle for
//! every match, and subscribes each match to the publisher. Elements added
//! to the page later are not picked up.
//!
//! The geometry helpers express an element's position as a scroll percent so
//! ranges can be anchored to content:
//!
//! ```rust,ignore
//! let start = element_top(&publisher, "#hero")?;
//! let end = element_bottom(&publisher, "#hero")?;
//! register_animation(&publisher, "#hero img")?
//!     .from(start, [("scaleX", 1.0), ("scaleY", 1.0)])
//!     .to(end, [("scaleX", 1.2), ("scaleY", 1.2)]);
//! ```

use kurbo::Rect;

use crate::animation::Animation;
use crate::diagnostics::Diagnostic;
use crate::publisher::Publisher;
use crate::target::{Host, ScrollMetrics};
use crate::trigger::Trigger;

/// Registers an animation on every element matching `selector`.
///
/// Fails with [`Diagnostic::SelectorNotFound`] (also reported to the
/// publisher's sink) when nothing matches; no subscription is made then.
pub fn register_animation<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<Animation, Diagnostic> {
    let elements = resolve(publisher, selector)?;
    let animation = Animation::new(publisher.diagnostics().clone());
    for element in elements {
        publisher.subscribe(element, animation.listener());
    }
    tracing::debug!(target: "scrollfx", selector, "animation registered");
    Ok(animation)
}

/// Registers a trigger on every element matching `selector`.
///
/// Same failure behavior as [`register_animation`].
pub fn register_trigger<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<Trigger, Diagnostic> {
    let elements = resolve(publisher, selector)?;
    let trigger = Trigger::new();
    for element in elements {
        publisher.subscribe(element, trigger.listener());
    }
    tracing::debug!(target: "scrollfx", selector, "trigger registered");
    Ok(trigger)
}

/// Scroll percent at which the top of the first match enters the viewport
/// from below.
pub fn element_top<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<f64, Diagnostic> {
    let (rect, m) = first_rect(publisher, selector)?;
    Ok((rect.y0 + m.scroll_y - m.viewport_height) / m.scroll_height)
}

/// Scroll percent at which the bottom of the first match enters the viewport
/// from below.
pub fn element_bottom<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<f64, Diagnostic> {
    let (rect, m) = first_rect(publisher, selector)?;
    Ok((rect.y1 + m.scroll_y - m.viewport_height) / m.scroll_height)
}

/// Height of the first match as a fraction of the document height.
pub fn element_height<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<f64, Diagnostic> {
    let (rect, m) = first_rect(publisher, selector)?;
    Ok(rect.height() / m.scroll_height)
}

fn resolve<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<Vec<H::Element>, Diagnostic> {
    let elements = publisher.host().query_all(selector);
    if elements.is_empty() {
        let diagnostic = Diagnostic::SelectorNotFound {
            selector: selector.into(),
        };
        publisher.diagnostics().report(&diagnostic);
        return Err(diagnostic);
    }
    Ok(elements)
}

fn first_rect<H: Host + 'static>(
    publisher: &Publisher<H>,
    selector: &str,
) -> Result<(Rect, ScrollMetrics), Diagnostic> {
    let host = publisher.host();
    let element = resolve(publisher, selector)?
        .into_iter()
        .next()
        .ok_or_else(|| Diagnostic::SelectorNotFound {
            selector: selector.into(),
        })?;
    Ok((host.bounding_rect(&element), host.scroll_metrics()))
}
