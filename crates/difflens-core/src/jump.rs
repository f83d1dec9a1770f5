#![forbid(unsafe_code)]

//! "Jump to source" query.

use std::fmt;

use crate::document::DiffDocument;
use crate::header::HeaderRecord;
use crate::line_number;

/// Where a jump from the diff should land.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpTarget {
    /// The file the line belongs to.
    pub header: HeaderRecord,
    /// 1-indexed line in that file.
    pub source_line: u32,
}

impl fmt::Display for JumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.header.filename, self.source_line)
    }
}

/// Resolve the source location for a cursor on `current_line` (1-indexed).
///
/// On a header line, the first line of that file carrying an added or
/// removed span is resolved without a cursor column. Elsewhere the current
/// line is resolved with the cursor column and paired with the nearest
/// header at or before it.
#[must_use]
pub fn resolve_jump(
    document: &DiffDocument,
    current_line: usize,
    cursor_col: usize,
) -> Option<JumpTarget> {
    let headers = document.headers();
    if headers.is_header(current_line) {
        let header = headers.header_at_or_before(current_line)?;
        let end = headers
            .next_header_after(current_line)
            .map_or(document.len(), |next| next.line - 1);
        for line in current_line + 1..=end {
            let Some(parsed) = document.line(line) else {
                break;
            };
            if !parsed.has_change_marker() {
                continue;
            }
            if let Some(source_line) = line_number::resolve(&parsed.text, None) {
                return Some(JumpTarget {
                    header: header.clone(),
                    source_line,
                });
            }
        }
        crate::debug!(line = current_line, "no numbered change below header");
        return None;
    }

    let parsed = document.line(current_line)?;
    let source_line = line_number::resolve(&parsed.text, Some(cursor_col))?;
    let header = headers.header_at_or_before(current_line)?;
    Some(JumpTarget {
        header: header.clone(),
        source_line,
    })
}
