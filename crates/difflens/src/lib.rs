#![forbid(unsafe_code)]

//! difflens public facade crate.
//!
//! Re-exports the parsing core and the style model, and adds what the
//! `difflens` binary needs around them: environment configuration, the diff
//! source runner, and terminal and JSON renderers.

use std::fmt;

pub mod app;
pub mod cli;
pub mod config;
pub mod emit;
pub mod logging;
pub mod render;
pub mod source;

// --- Core re-exports -------------------------------------------------------

pub use difflens_core::{
    Cursor, DiffDocument, HeaderIndex, HeaderRecord, JumpTarget, LineKind, MemorySurface,
    NavigationState, ParsedLine, Session, SplitView, Step, StyleSpan, Surface, TrimInfo,
};

// --- Style re-exports ------------------------------------------------------

pub use difflens_style::{
    ColorClass, ConcreteStyle, DiffTheme, FormatCache, ResolvedTheme, Rgb, StyleFlags, StyleKey,
    StyleRef, StyleRefParseError, StyleSheet,
};

pub use config::{Config, ConfigError, Layout};

pub use difflens_core as core;
pub use difflens_style as style;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for difflens.
#[derive(Debug)]
pub enum Error {
    /// I/O failure reading input or writing output.
    Io(std::io::Error),
    /// The diff command could not be launched or failed.
    Command(String),
    /// Invalid configuration or arguments.
    Config(Vec<ConfigError>),
    /// A cursor position outside the document.
    Cursor { line: usize, line_count: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Command(msg) => write!(f, "{msg}"),
            Self::Config(errors) => {
                f.write_str("invalid configuration: ")?;
                for (idx, err) in errors.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Self::Cursor { line, line_count } => {
                write!(f, "line {line} is outside the diff (1..={line_count})")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for difflens APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Cursor {
            line: 9,
            line_count: 3,
        };
        assert_eq!(err.to_string(), "line 9 is outside the diff (1..=3)");

        let err: Error = vec![
            ConfigError::new("width", "x", "expected integer"),
            ConfigError::new("layout", "y", "expected split|unified"),
        ]
        .into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: width=x (expected integer); layout=y (expected split|unified)"
        );
    }

    #[test]
    fn io_error_has_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "boom");
    }
}
