#![forbid(unsafe_code)]

//! Output modes of the binary: re-rendered diff, header list, JSON export
//! and jump queries.

use std::io::{self, Write};

use difflens_core::{
    DiffDocument, HeaderIndex, HeaderRecord, JumpTarget, ParsedLine, Session, SplitView,
};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::emit::write_styled;
use crate::{Error, Result};

/// Gap between the two columns of a split rendering.
const COLUMN_GAP: usize = 2;

/// Print every line as parsed, with SGR codes regenerated from the theme.
pub fn render_unified<W: Write>(w: &mut W, session: &mut Session, color: bool) -> io::Result<()> {
    let (doc, cache) = session.draw_parts();
    for line in doc.lines() {
        write_styled(w, &line.text, &line.spans, cache, color)?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// Print side-by-side sections as two aligned columns.
///
/// Headers and single-column lines are printed once at full width.
pub fn render_split<W: Write>(
    w: &mut W,
    session: &mut Session,
    nominal_width: usize,
    color: bool,
) -> io::Result<()> {
    let (doc, cache) = session.draw_parts();
    let view = doc.side_by_side(nominal_width);
    let left_width = view
        .left
        .iter()
        .zip(&view.columns)
        .filter(|&(_, &col)| col > 0)
        .map(|(text, _)| text.width())
        .max()
        .unwrap_or(0)
        .max(nominal_width / 2);

    for idx in 0..view.len() {
        let left = &view.left[idx];
        write_styled(w, left, &view.left_spans[idx], cache, color)?;
        if view.columns[idx] > 0 && !view.right[idx].is_empty() {
            let pad = left_width.saturating_sub(left.width()) + COLUMN_GAP;
            write!(w, "{:pad$}", "")?;
            write_styled(w, &view.right[idx], &view.right_spans[idx], cache, color)?;
        }
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// One header per line: banner line, file name, language and step.
pub fn render_headers<W: Write>(w: &mut W, headers: &HeaderIndex) -> io::Result<()> {
    for header in headers.headers() {
        writeln!(w, "{}", header_summary(header))?;
    }
    Ok(())
}

/// Tab-separated summary of a header.
#[must_use]
pub fn header_summary(header: &HeaderRecord) -> String {
    let mut out = format!("{}\t{}", header.line, header.filename);
    out.push('\t');
    if let Some(language) = &header.language {
        out.push_str(language);
    }
    out.push('\t');
    if let Some(step) = header.step {
        out.push_str(&step.to_string());
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    headers: &'a [HeaderRecord],
    lines: &'a [ParsedLine],
    #[serde(skip_serializing_if = "Option::is_none")]
    split: Option<SplitView>,
}

/// Export the parsed document as pretty JSON.
///
/// With `split_width` the side-by-side view for that width is included.
pub fn render_json<W: Write>(
    w: &mut W,
    doc: &DiffDocument,
    split_width: Option<usize>,
) -> io::Result<()> {
    let report = JsonReport {
        headers: doc.headers().headers(),
        lines: doc.lines(),
        split: split_width.map(|width| doc.side_by_side(width)),
    };
    serde_json::to_writer_pretty(&mut *w, &report)?;
    w.write_all(b"\n")
}

/// Resolve a jump for a 1-indexed line, rejecting lines outside the document.
pub fn jump(doc: &DiffDocument, line: usize, col: usize) -> Result<Option<JumpTarget>> {
    if line == 0 || line > doc.len() {
        return Err(Error::Cursor {
            line,
            line_count: doc.len(),
        });
    }
    Ok(doc.jump(line, col))
}
