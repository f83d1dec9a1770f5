#![forbid(unsafe_code)]

//! Style model for difflens.
//!
//! - [`ColorClass`] - semantic bucket for an SGR foreground color
//! - [`StyleFlags`] / [`StyleKey`] - composite style identity of a span
//! - [`StyleRef`] - configured style for a class (named, direct, link-extract)
//! - [`StyleSheet`] - named groups exposed by the host
//! - [`DiffTheme`] / [`ResolvedTheme`] - per-class styles, resolved once
//! - [`FormatCache`] - memoized concrete styles, cleared on theme change

pub mod attrs;
pub mod cache;
pub mod class;
pub mod color;
pub mod style_ref;
pub mod stylesheet;
pub mod theme;

pub use attrs::{STYLE_NAME_PREFIX, StyleFlags, StyleKey};
pub use cache::{CacheStats, ConcreteStyle, FormatCache};
pub use class::ColorClass;
pub use color::Rgb;
pub use style_ref::{ResolvedColors, StyleRef, StyleRefParseError, UnknownStyle};
pub use stylesheet::{NamedStyle, StyleSheet};
pub use theme::{DiffTheme, DiffThemeBuilder, ResolvedTheme, ThemeResolution, themes};
