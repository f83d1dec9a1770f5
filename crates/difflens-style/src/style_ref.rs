#![forbid(unsafe_code)]

//! Style references as they appear in configuration.
//!
//! A color class can be styled three ways:
//!
//! | form | example | meaning |
//! |------|---------|---------|
//! | named | `name:DiffAdd` or `DiffAdd` | use the named group as-is |
//! | direct | `#98c379` or `#98c379/#203020` | explicit fg (and bg) |
//! | link-extract | `link:DiffAdd` or `link:DiffAdd:bg` | take the group's fg, and its bg only with `:bg` |
//!
//! References are parsed once and resolved once against a [`StyleSheet`];
//! nothing is re-interpreted per draw.

use std::fmt;
use std::str::FromStr;

use crate::attrs::StyleFlags;
use crate::color::Rgb;
use crate::stylesheet::StyleSheet;

/// A configured style for one color class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleRef {
    /// Use a named group from the style sheet unchanged.
    Named(String),
    /// Explicit colors.
    Direct { fg: Option<Rgb>, bg: Option<Rgb> },
    /// Copy the foreground of `source`; copy its background only when `keep_bg`.
    LinkExtract { source: String, keep_bg: bool },
}

/// Concrete colors produced by resolving a [`StyleRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolvedColors {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    /// Attributes inherited from a named group.
    pub flags: StyleFlags,
}

impl StyleRef {
    /// Reference a named group.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Foreground-only direct style.
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self::Direct {
            fg: Some(color),
            bg: None,
        }
    }

    /// Extract from a named group.
    #[must_use]
    pub fn link(source: impl Into<String>, keep_bg: bool) -> Self {
        Self::LinkExtract {
            source: source.into(),
            keep_bg,
        }
    }

    /// Resolve against a style sheet.
    pub fn resolve(&self, sheet: &StyleSheet) -> Result<ResolvedColors, UnknownStyle> {
        match self {
            Self::Direct { fg, bg } => Ok(ResolvedColors {
                fg: *fg,
                bg: *bg,
                flags: StyleFlags::empty(),
            }),
            Self::Named(name) => {
                let style = sheet.get(name).ok_or_else(|| UnknownStyle(name.clone()))?;
                Ok(ResolvedColors {
                    fg: style.fg,
                    bg: style.bg,
                    flags: style.flags,
                })
            }
            Self::LinkExtract { source, keep_bg } => {
                let style = sheet
                    .get(source)
                    .ok_or_else(|| UnknownStyle(source.clone()))?;
                Ok(ResolvedColors {
                    fg: style.fg,
                    bg: if *keep_bg { style.bg } else { None },
                    flags: StyleFlags::empty(),
                })
            }
        }
    }
}

impl fmt::Display for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "name:{name}"),
            Self::Direct { fg, bg } => {
                if let Some(fg) = fg {
                    write!(f, "{fg}")?;
                }
                if let Some(bg) = bg {
                    write!(f, "/{bg}")?;
                }
                Ok(())
            }
            Self::LinkExtract { source, keep_bg } => {
                write!(f, "link:{source}")?;
                if *keep_bg {
                    f.write_str(":bg")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for StyleRef {
    type Err = StyleRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(StyleRefParseError::new(s, "empty style reference"));
        }

        if let Some(rest) = text.strip_prefix("link:") {
            let (source, keep_bg) = match rest.rsplit_once(':') {
                Some((source, "bg")) => (source, true),
                Some(_) => {
                    return Err(StyleRefParseError::new(s, "link suffix must be ':bg'"));
                }
                None => (rest, false),
            };
            let source = check_group_name(s, source)?;
            return Ok(Self::link(source, keep_bg));
        }

        if let Some(rest) = text.strip_prefix("name:") {
            return Ok(Self::named(check_group_name(s, rest)?));
        }

        if text.starts_with('#') || text.starts_with('/') {
            let (fg_text, bg_text) = match text.split_once('/') {
                Some((fg, bg)) => (fg, Some(bg)),
                None => (text, None),
            };
            let fg = parse_optional_hex(s, fg_text)?;
            let bg = match bg_text {
                Some(bg) => parse_optional_hex(s, bg)?,
                None => None,
            };
            if fg.is_none() && bg.is_none() {
                return Err(StyleRefParseError::new(s, "no colors given"));
            }
            return Ok(Self::Direct { fg, bg });
        }

        Ok(Self::named(check_group_name(s, text)?))
    }
}

fn check_group_name<'a>(input: &str, name: &'a str) -> Result<&'a str, StyleRefParseError> {
    let name = name.trim();
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '@')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    if valid {
        Ok(name)
    } else {
        Err(StyleRefParseError::new(input, "invalid group name"))
    }
}

fn parse_optional_hex(input: &str, text: &str) -> Result<Option<Rgb>, StyleRefParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Rgb::from_hex(text)
        .map(Some)
        .ok_or_else(|| StyleRefParseError::new(input, "invalid hex color"))
}

/// A style reference string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRefParseError {
    pub input: String,
    pub message: &'static str,
}

impl StyleRefParseError {
    fn new(input: &str, message: &'static str) -> Self {
        Self {
            input: input.to_string(),
            message,
        }
    }
}

impl fmt::Display for StyleRefParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid style reference {:?}: {}", self.input, self.message)
    }
}

impl std::error::Error for StyleRefParseError {}

/// A named group referenced by configuration is missing from the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown style group {:?}", self.0)
    }
}

impl std::error::Error for UnknownStyle {}
