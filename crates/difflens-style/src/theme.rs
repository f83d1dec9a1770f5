#![forbid(unsafe_code)]

//! Diff themes: one [`StyleRef`] per color class.
//!
//! A [`DiffTheme`] is what configuration produces. Resolving it against a
//! [`StyleSheet`] yields a [`ResolvedTheme`] of concrete colors, computed
//! once when the configuration (or the host palette) changes.
//!
//! # Example
//! ```
//! use difflens_style::{ColorClass, DiffTheme, Rgb, StyleRef, StyleSheet};
//!
//! let theme = DiffTheme::builder()
//!     .style(ColorClass::Add, StyleRef::fg(Rgb::new(0, 255, 0)))
//!     .build();
//! let resolved = theme.resolve(&StyleSheet::with_defaults()).theme;
//! assert_eq!(resolved.colors(ColorClass::Add).fg, Some(Rgb::new(0, 255, 0)));
//! ```

use std::env;

use crate::class::ColorClass;
use crate::color::Rgb;
use crate::style_ref::{ResolvedColors, StyleRef, UnknownStyle};
use crate::stylesheet::StyleSheet;

/// Style references for every color class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTheme {
    styles: [StyleRef; 7],
}

impl Default for DiffTheme {
    fn default() -> Self {
        themes::linked()
    }
}

impl DiffTheme {
    /// Create a new theme builder starting from [`themes::linked`].
    pub fn builder() -> DiffThemeBuilder {
        DiffThemeBuilder::new()
    }

    /// Style reference for a class.
    #[must_use]
    pub fn style(&self, class: ColorClass) -> &StyleRef {
        &self.styles[slot(class)]
    }

    /// Replace the style reference for a class.
    pub fn set_style(&mut self, class: ColorClass, style: StyleRef) {
        self.styles[slot(class)] = style;
    }

    /// Detect whether dark mode should be used.
    ///
    /// Reads `COLORFGBG` (`fg;bg`); a background of 7 or 15 means light.
    /// Defaults to dark.
    #[must_use]
    pub fn detect_dark_mode() -> bool {
        Self::detect_dark_mode_from_colorfgbg(env::var("COLORFGBG").ok().as_deref())
    }

    fn detect_dark_mode_from_colorfgbg(colorfgbg: Option<&str>) -> bool {
        if let Some(colorfgbg) = colorfgbg
            && let Some(bg_part) = colorfgbg.split(';').next_back()
            && let Ok(bg) = bg_part.trim().parse::<u8>()
        {
            return bg != 7 && bg != 15;
        }
        true
    }

    /// Resolve every class against the sheet.
    ///
    /// Classes whose group is missing fall back to the built-in palette and
    /// are reported in [`ThemeResolution::missing`].
    #[must_use]
    pub fn resolve(&self, sheet: &StyleSheet) -> ThemeResolution {
        let mut colors = [ResolvedColors::default(); 7];
        let mut missing = Vec::new();
        for class in ColorClass::ALL {
            colors[slot(class)] = match self.style(class).resolve(sheet) {
                Ok(resolved) => resolved,
                Err(err) => {
                    missing.push(err);
                    fallback(class)
                }
            };
        }
        ThemeResolution {
            theme: ResolvedTheme { colors },
            missing,
        }
    }
}

/// Result of [`DiffTheme::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResolution {
    pub theme: ResolvedTheme,
    /// Groups that were referenced but not defined.
    pub missing: Vec<UnknownStyle>,
}

/// Concrete colors for every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedTheme {
    colors: [ResolvedColors; 7],
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        DiffTheme::default()
            .resolve(&StyleSheet::with_defaults())
            .theme
    }
}

impl ResolvedTheme {
    /// Colors for a class.
    #[must_use]
    pub fn colors(&self, class: ColorClass) -> ResolvedColors {
        self.colors[slot(class)]
    }
}

const fn slot(class: ColorClass) -> usize {
    match class {
        ColorClass::Add => 0,
        ColorClass::Delete => 1,
        ColorClass::Change => 2,
        ColorClass::Info => 3,
        ColorClass::Hint => 4,
        ColorClass::Dim => 5,
        ColorClass::Neutral => 6,
    }
}

/// Built-in palette used when a referenced group is missing.
#[must_use]
pub fn fallback(class: ColorClass) -> ResolvedColors {
    let fg = match class {
        ColorClass::Add => Rgb::new(80, 200, 120),
        ColorClass::Delete => Rgb::new(230, 90, 90),
        ColorClass::Change => Rgb::new(230, 200, 90),
        ColorClass::Info => Rgb::new(90, 160, 230),
        ColorClass::Hint => Rgb::new(190, 120, 220),
        ColorClass::Dim => Rgb::new(110, 110, 110),
        ColorClass::Neutral => Rgb::new(200, 200, 200),
    };
    ResolvedColors {
        fg: Some(fg),
        ..ResolvedColors::default()
    }
}

/// Builder for [`DiffTheme`].
#[derive(Debug, Clone)]
pub struct DiffThemeBuilder {
    theme: DiffTheme,
}

impl DiffThemeBuilder {
    /// Start from the linked theme.
    pub fn new() -> Self {
        Self {
            theme: themes::linked(),
        }
    }

    /// Set the style for one class.
    pub fn style(mut self, class: ColorClass, style: StyleRef) -> Self {
        self.theme.set_style(class, style);
        self
    }

    /// Build the theme.
    pub fn build(self) -> DiffTheme {
        self.theme
    }
}

impl Default for DiffThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in theme presets.
pub mod themes {
    use super::*;

    /// Extracts foregrounds from the host's diff and diagnostic groups.
    #[must_use]
    pub fn linked() -> DiffTheme {
        DiffTheme {
            styles: [
                StyleRef::link("DiffAdd", false),
                StyleRef::link("DiffDelete", false),
                StyleRef::link("DiffChange", false),
                StyleRef::link("DiagnosticInfo", false),
                StyleRef::link("DiagnosticHint", false),
                StyleRef::named("Comment"),
                StyleRef::named("Normal"),
            ],
        }
    }

    /// Fixed colors for dark backgrounds; needs no style sheet.
    #[must_use]
    pub fn dark() -> DiffTheme {
        DiffTheme {
            styles: ColorClass::ALL.map(|class| {
                let colors = fallback(class);
                StyleRef::Direct {
                    fg: colors.fg,
                    bg: None,
                }
            }),
        }
    }

    /// Fixed colors for light backgrounds; needs no style sheet.
    #[must_use]
    pub fn light() -> DiffTheme {
        let fg = |class| match class {
            ColorClass::Add => Rgb::new(20, 120, 40),
            ColorClass::Delete => Rgb::new(180, 30, 30),
            ColorClass::Change => Rgb::new(150, 110, 0),
            ColorClass::Info => Rgb::new(20, 80, 170),
            ColorClass::Hint => Rgb::new(130, 40, 160),
            ColorClass::Dim => Rgb::new(140, 140, 140),
            ColorClass::Neutral => Rgb::new(40, 40, 40),
        };
        DiffTheme {
            styles: ColorClass::ALL.map(|class| StyleRef::fg(fg(class))),
        }
    }

    /// Pick [`dark`] or [`light`].
    #[must_use]
    pub fn for_mode(is_dark: bool) -> DiffTheme {
        if is_dark { dark() } else { light() }
    }
}
