#![forbid(unsafe_code)]

//! Core: ANSI parsing, file headers, line numbers, column splitting and
//! navigation over difftastic output.

pub mod ansi;
pub mod document;
pub mod header;
pub mod jump;
pub mod line_number;
pub mod logging;
pub mod navigation;
pub mod split;
pub mod surface;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

pub use ansi::{ParsedLine, SgrState, Spans, StyleSpan, parse_line, parse_lines, strip_ansi};
pub use document::{DiffDocument, Session, SplitView};
pub use header::{HeaderIndex, HeaderRecord, Step, classify, parse_header};
pub use jump::{JumpTarget, resolve_jump};
pub use line_number::{LineKind, resolve};
pub use navigation::NavigationState;
pub use split::{SplitOutput, TrimInfo, compute_sections, remap_spans, section_ranges, split};
pub use surface::{Cursor, MemorySurface, Surface};
