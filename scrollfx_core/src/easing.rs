// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing functions and animation options.
//!
//! An [`Easing`] maps a progress ratio in `[0, 1]` to an eased ratio in
//! `[0, 1]`. Every curve maps 0 to 0 and 1 to 1.
//!
//! Easing names are parsed eagerly: [`Easing::from_str`],
//! [`Options::from_easing_name`] and deserialization all reject names outside
//! the fixed set with [`Diagnostic::UnknownEasing`], so an unknown name can
//! never reach the per-frame interpolation.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// The fixed set of easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum Easing {
    /// `p`
    #[default]
    Linear,
    /// `p²`
    EaseIn,
    /// `1 − (1 − p)²`
    EaseOut,
    /// `2p²` below one half, `1 − (−2p + 2)² / 2` above.
    EaseInOut,
}

impl Easing {
    /// All easing curves, in declaration order.
    pub const ALL: [Self; 4] = [Self::Linear, Self::EaseIn, Self::EaseOut, Self::EaseInOut];

    /// Applies the curve to a progress ratio.
    ///
    /// Callers pass ratios already clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn apply(self, p: f64) -> f64 {
        match self {
            Self::Linear => p,
            Self::EaseIn => p * p,
            Self::EaseOut => {
                let inv = 1.0 - p;
                1.0 - inv * inv
            }
            Self::EaseInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    let t = -2.0 * p + 2.0;
                    1.0 - t * t / 2.0
                }
            }
        }
    }

    /// Returns the name used in options objects.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = Diagnostic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| Diagnostic::UnknownEasing { name: s.into() })
    }
}

impl TryFrom<String> for Easing {
    type Error = Diagnostic;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Options accepted by [`Animation::using`](crate::animation::Animation::using).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Curve applied to the relative progress before interpolating.
    pub easing: Easing,
}

impl Options {
    /// Creates options with the given easing.
    #[must_use]
    pub const fn new(easing: Easing) -> Self {
        Self { easing }
    }

    /// Creates options from an easing name such as `"easeInOut"`.
    pub fn from_easing_name(name: &str) -> Result<Self, Diagnostic> {
        Ok(Self::new(name.parse()?))
    }
}
