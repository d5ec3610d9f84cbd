// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The engine never touches a DOM directly. Backends provide two pieces:
//!
//! - **[`Target`]**: one element whose inline style and class list the
//!   listeners mutate.
//! - **[`Host`]**: the page. It resolves selectors, reports scroll metrics and
//!   element geometry, tells the publisher when an element leaves the page,
//!   and installs the document-wide smooth-scroll rule.
//!
//! The frame scheduling primitive is a separate seam,
//! [`FrameLoop`](crate::publisher::FrameLoop), because its lifecycle is owned
//! by the publisher rather than by the page.

use kurbo::Rect;

use crate::publisher::SubscriberId;

/// An element that listeners write to.
///
/// Writes are fire-and-forget: a backend that fails to apply a property has
/// no way to recover mid-frame and simply drops the write.
pub trait Target {
    /// Sets an inline style property, e.g. `("opacity", "0.5")`.
    fn set_style_property(&self, name: &str, value: &str);

    /// Adds a class. Adding a class that is already present is a no-op.
    fn add_class(&self, name: &str);

    /// Removes a class. Removing an absent class is a no-op.
    fn remove_class(&self, name: &str);
}

/// Scroll state of the document, read once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset.
    pub scroll_y: f64,
    /// Total height of the document body.
    pub scroll_height: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Distance the document can scroll.
    #[inline]
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }

    /// Normalized scroll position, nominally in `[0, 1]`.
    ///
    /// On a page that cannot scroll this is not finite; see
    /// [`NonFinitePolicy`](crate::publisher::NonFinitePolicy).
    #[inline]
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.scroll_y / self.max_scroll()
    }
}

/// The page that hosts scroll effects.
pub trait Host {
    /// Element handle produced by [`query_all`](Self::query_all).
    type Element: Target + Clone + 'static;

    /// Resolves a selector to the matching elements in document order.
    ///
    /// An empty result is a valid outcome.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Reads the current scroll state.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Returns the element's bounding box relative to the viewport.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// Arranges for `callback` to run once when `element` is removed from the
    /// page, keyed by the subscription it ends.
    ///
    /// If `element` is already detached, `callback` runs before this returns.
    fn on_removed(&self, subscriber: SubscriberId, element: &Self::Element, callback: Box<dyn FnOnce()>);

    /// Drops the removal callback registered for `subscriber`, if any.
    fn forget_removed(&self, subscriber: SubscriberId);

    /// Installs the document-wide `scroll-behavior: smooth` rule.
    fn install_smooth_scroll(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_offset_over_scrollable_distance() {
        let m = ScrollMetrics {
            scroll_y: 250.0,
            scroll_height: 2000.0,
            viewport_height: 1000.0,
        };
        assert_eq!(m.max_scroll(), 1000.0);
        assert_eq!(m.percent(), 0.25);
    }

    #[test]
    fn unscrollable_page_is_not_finite() {
        let m = ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 800.0,
            viewport_height: 800.0,
        };
        assert!(!m.percent().is_finite(), "0 / 0 is NaN");
    }
}
