// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability shared by every scroll effect.

use crate::target::Target;

/// Maps a scroll percent to a visual mutation of one element.
///
/// [`Animation`](crate::animation::Animation) and
/// [`Trigger`](crate::trigger::Trigger) implement this through their shared
/// state; hosts can subscribe their own implementations with
/// [`Publisher::subscribe`](crate::publisher::Publisher::subscribe).
///
/// One listener may be shared by several subscribers, in which case `listen`
/// is called once per subscriber with the same percent during a tick.
pub trait Listener {
    /// Reacts to the percent sampled for the current frame.
    ///
    /// `percent` is nominally in `[0, 1]` but may fall outside it on
    /// overscroll. Callers other than the publisher may pass non-finite
    /// values; those must never reach visual state.
    fn listen(&mut self, percent: f64, target: &dyn Target);
}
