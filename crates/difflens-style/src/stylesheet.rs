#![forbid(unsafe_code)]

//! Registry of named styles.
//!
//! A host (editor, terminal theme) exposes its colors as named groups:
//! `DiffAdd`, `Comment`, and so on. `StyleRef::Named` and
//! `StyleRef::LinkExtract` values look colors up here when a theme is
//! resolved.
//!
//! # Example
//! ```
//! use difflens_style::{NamedStyle, Rgb, StyleSheet};
//!
//! let mut sheet = StyleSheet::new();
//! sheet.define("DiffAdd", NamedStyle::fg(Rgb::new(80, 200, 120)));
//! assert!(sheet.get("DiffAdd").is_some());
//! ```

use std::collections::HashMap;

use crate::attrs::StyleFlags;
use crate::color::Rgb;

/// Colors and attributes of one named group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NamedStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub flags: StyleFlags,
}

impl NamedStyle {
    /// Foreground-only style.
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            flags: StyleFlags::empty(),
        }
    }

    /// Add a background color.
    #[must_use]
    pub const fn with_bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }
}

/// Named style registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    styles: HashMap<String, NamedStyle>,
}

impl StyleSheet {
    /// Create an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet with the groups the default diff themes link to.
    ///
    /// - `DiffAdd`, `DiffDelete`, `DiffChange`, `DiffText`: diff hunks
    /// - `Comment`: muted text
    /// - `Normal`: plain foreground
    /// - `DiagnosticInfo`, `DiagnosticHint`: annotations
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut sheet = Self::new();
        sheet.define(
            "DiffAdd",
            NamedStyle::fg(Rgb::new(152, 195, 121)).with_bg(Rgb::new(32, 48, 32)),
        );
        sheet.define(
            "DiffDelete",
            NamedStyle::fg(Rgb::new(224, 108, 117)).with_bg(Rgb::new(56, 32, 32)),
        );
        sheet.define(
            "DiffChange",
            NamedStyle::fg(Rgb::new(229, 192, 123)).with_bg(Rgb::new(48, 44, 28)),
        );
        sheet.define(
            "DiffText",
            NamedStyle::fg(Rgb::new(229, 192, 123)).with_flags(StyleFlags::BOLD),
        );
        sheet.define(
            "Comment",
            NamedStyle::fg(Rgb::new(92, 99, 112)).with_flags(StyleFlags::ITALIC),
        );
        sheet.define("Normal", NamedStyle::fg(Rgb::new(171, 178, 191)));
        sheet.define("DiagnosticInfo", NamedStyle::fg(Rgb::new(97, 175, 239)));
        sheet.define("DiagnosticHint", NamedStyle::fg(Rgb::new(198, 120, 221)));
        sheet
    }

    /// Define or replace a named style.
    pub fn define(&mut self, name: impl Into<String>, style: NamedStyle) {
        self.styles.insert(name.into(), style);
    }

    /// Look up a style by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedStyle> {
        self.styles.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
