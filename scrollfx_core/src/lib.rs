// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven style animation and class triggers.
//!
//! `scrollfx_core` maps the document's vertical scroll position to visual
//! changes on selected elements. It is platform independent: a backend
//! supplies the page through the [`Host`](target::Host) trait and a per-frame
//! tick source through [`FrameLoop`](publisher::FrameLoop).
//!
//! # Architecture
//!
//! ```text
//!   FrameLoop (tick source)
//!       │
//!       ▼
//!   Publisher::tick() ──► percent ──► Subscriber × N
//!                                         │
//!                 ┌───────────────────────┘
//!                 ▼
//!   Listener::listen() ──► Target (inline style, class list)
//! ```
//!
//! **[`publisher`]**: samples scroll position once per frame and fans it out
//! to every subscriber. The frame loop runs only while subscribers exist.
//!
//! **[`animation`]**: interpolates opacity, translation and scale between two
//! scroll percents, shaped by an [`Easing`](easing::Easing).
//!
//! **[`trigger`]**: adds and removes classes once when a threshold is
//! crossed.
//!
//! **[`register`]**: selector-based registration and element geometry
//! helpers.
//!
//! **[`style`]**: the property whitelist and CSS serialization.
//!
//! **[`diagnostics`]**: the [`Diagnostic`](diagnostics::Diagnostic) error type
//! and the sinks that route it to logs.
//!
//! # Example
//!
//! ```rust,ignore
//! use scrollfx_core::register::{register_animation, register_trigger};
//!
//! register_animation(&publisher, "#box")?
//!     .from(0.0, [("opacity", 0.0)])
//!     .to(1.0, [("opacity", 1.0)]);
//!
//! register_trigger(&publisher, ".reveal")?
//!     .after(0.5)
//!     .apply_class("visible");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod animation;
pub mod diagnostics;
pub mod easing;
pub mod listener;
pub mod publisher;
pub mod register;
pub mod style;
pub mod target;
pub mod trigger;

#[cfg(test)]
mod testing;
