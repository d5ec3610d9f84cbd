// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style values and their application to a [`Target`].
//!
//! Only the five properties in [`StyleProperty`] exist. A [`Style`] holds a
//! value for each; a [`PropertySet`] selects which of them are written.
//!
//! Translation and scale share the CSS `transform` property, so
//! [`Style::apply_to`] composes one transform string from the selected
//! transform components, in the fixed order translate-x, translate-y,
//! scale-x, scale-y. Components outside the set are left out of the string
//! rather than written at their defaults.

use core::fmt;
use core::str::FromStr;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::target::Target;

/// A style property that scroll effects can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    /// `opacity`, unitless.
    Opacity,
    /// Horizontal translation in pixels.
    TranslateX,
    /// Vertical translation in pixels.
    TranslateY,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
}

impl StyleProperty {
    /// All properties, in application order.
    pub const ALL: [Self; 5] = [
        Self::Opacity,
        Self::TranslateX,
        Self::TranslateY,
        Self::ScaleX,
        Self::ScaleY,
    ];

    /// Returns the key callers use to configure this property.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StyleProperty {
    type Err = Diagnostic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| Diagnostic::UnsupportedStyleProperty { name: s.into() })
    }
}

/// A set of [`StyleProperty`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PropertySet(u8);

impl PropertySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Adds a property. Adding it twice is a no-op.
    pub fn insert(&mut self, property: StyleProperty) {
        self.0 |= property.bit();
    }

    /// Returns `true` if the set contains `property`.
    #[must_use]
    pub const fn contains(self, property: StyleProperty) -> bool {
        self.0 & property.bit() != 0
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of properties in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the contained properties in application order.
    pub fn iter(self) -> impl Iterator<Item = StyleProperty> {
        StyleProperty::ALL
            .into_iter()
            .filter(move |p| self.contains(*p))
    }
}

impl FromIterator<StyleProperty> for PropertySet {
    fn from_iter<I: IntoIterator<Item = StyleProperty>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Values for every [`StyleProperty`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    /// Opacity, 1 by default.
    pub opacity: f64,
    /// Horizontal translation in pixels, 0 by default.
    pub translate_x: f64,
    /// Vertical translation in pixels, 0 by default.
    pub translate_y: f64,
    /// Horizontal scale, 1 by default.
    pub scale_x: f64,
    /// Vertical scale, 1 by default.
    pub scale_y: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Style {
    /// Returns the value of one property.
    #[must_use]
    pub const fn get(&self, property: StyleProperty) -> f64 {
        match property {
            StyleProperty::Opacity => self.opacity,
            StyleProperty::TranslateX => self.translate_x,
            StyleProperty::TranslateY => self.translate_y,
            StyleProperty::ScaleX => self.scale_x,
            StyleProperty::ScaleY => self.scale_y,
        }
    }

    /// Sets the value of one property.
    pub fn set(&mut self, property: StyleProperty, value: f64) {
        let slot = match property {
            StyleProperty::Opacity => &mut self.opacity,
            StyleProperty::TranslateX => &mut self.translate_x,
            StyleProperty::TranslateY => &mut self.translate_y,
            StyleProperty::ScaleX => &mut self.scale_x,
            StyleProperty::ScaleY => &mut self.scale_y,
        };
        *slot = value;
    }

    /// Builds the CSS `transform` value for the transform components in
    /// `properties`, or `None` if there are none.
    #[must_use]
    pub fn css_transform(&self, properties: PropertySet) -> Option<String> {
        let mut css = String::new();
        for property in properties.iter() {
            let v = self.get(property);
            let component = match property {
                StyleProperty::Opacity => continue,
                StyleProperty::TranslateX => format!("translateX({v}px)"),
                StyleProperty::TranslateY => format!("translateY({v}px)"),
                StyleProperty::ScaleX => format!("scaleX({v})"),
                StyleProperty::ScaleY => format!("scaleY({v})"),
            };
            if !css.is_empty() {
                css.push(' ');
            }
            css.push_str(&component);
        }
        (!css.is_empty()).then_some(css)
    }

    /// Writes the properties in `properties` to `target`.
    ///
    /// Opacity goes to `opacity`; translation and scale go to a single
    /// `transform`. Nothing is written for properties outside the set.
    pub fn apply_to(&self, target: &dyn Target, properties: PropertySet) {
        if properties.contains(StyleProperty::Opacity) {
            target.set_style_property("opacity", &format!("{}", self.opacity));
        }
        if let Some(transform) = self.css_transform(properties) {
            target.set_style_property("transform", &transform);
        }
    }
}

/// Parses `(key, value)` pairs against the property whitelist.
///
/// Unknown keys are reported to `diagnostics` and dropped; the rest are
/// returned in input order.
pub fn parse_entries<K, I>(entries: I, diagnostics: &dyn DiagnosticSink) -> Vec<(StyleProperty, f64)>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, f64)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| match key.as_ref().parse::<StyleProperty>() {
            Ok(property) => Some((property, value)),
            Err(diagnostic) => {
                diagnostics.report(&diagnostic);
                None
            }
        })
        .collect()
}
