#![forbid(unsafe_code)]

//! Semantic color classes.
//!
//! Difftastic only ever emits a handful of foreground colors. Rather than
//! carrying raw SGR numbers through the pipeline, each color code is mapped
//! onto one of seven semantic buckets. Themes attach concrete colors to the
//! buckets, so the same diff renders consistently under any palette.

use std::fmt;

/// Semantic color bucket for a run of diff text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorClass {
    /// Inserted text (green).
    Add,
    /// Removed text (red).
    Delete,
    /// Modified or highlighted text (yellow).
    Change,
    /// Informational text (blue, cyan).
    Info,
    /// Hints and annotations (magenta).
    Hint,
    /// De-emphasized text: line numbers, context markers (black, dim).
    Dim,
    /// Plain foreground (white).
    Neutral,
}

impl ColorClass {
    /// Every class, in declaration order.
    pub const ALL: [ColorClass; 7] = [
        Self::Add,
        Self::Delete,
        Self::Change,
        Self::Info,
        Self::Hint,
        Self::Dim,
        Self::Neutral,
    ];

    /// Map an SGR foreground code onto its class.
    ///
    /// Normal (30–37) and bright (90–97) codes share a hue table. Any other
    /// code returns `None`.
    #[must_use]
    pub const fn from_sgr(code: u16) -> Option<Self> {
        let hue = match code {
            30..=37 => code - 30,
            90..=97 => code - 90,
            _ => return None,
        };
        Some(match hue {
            0 => Self::Dim,
            1 => Self::Delete,
            2 => Self::Add,
            3 => Self::Change,
            4 => Self::Info,
            5 => Self::Hint,
            6 => Self::Info,
            _ => Self::Neutral,
        })
    }

    /// Stable name used in composite style names and configuration keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::Change => "Change",
            Self::Info => "Info",
            Self::Hint => "Hint",
            Self::Dim => "Dim",
            Self::Neutral => "Neutral",
        }
    }

    /// Whether this class marks changed content (added or removed text).
    #[must_use]
    pub const fn is_change_marker(self) -> bool {
        matches!(self, Self::Add | Self::Delete)
    }
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
