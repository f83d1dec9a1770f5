#![forbid(unsafe_code)]

//! Column-split engine.
//!
//! Difftastic's side-by-side layout prints old and new content on the same
//! terminal line separated by a whitespace gutter. This module finds that
//! gutter per section (a run of non-header lines) and cuts each line into a
//! left and a right half.
//!
//! A split column is only accepted when every line of the section has a
//! whitespace byte at that column, so a split never cuts through content.
//! A line ending before the column blocks it too. Sections without such a
//! column stay single-column.
//!
//! Columns are byte offsets into the clean text. Line `i` of a buffer is
//! line `i + 1` in the header set.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::ansi::{Spans, StyleSpan};

/// Whitespace removed around the split point of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrimInfo {
    /// Bytes between the end of the trimmed left half and the split column.
    /// For a line shorter than the split column this includes the missing
    /// tail.
    pub left_trim: usize,
    /// Leading whitespace bytes removed from the right half.
    pub right_trim: usize,
}

/// Both halves of a split buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitOutput {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub trims: Vec<TrimInfo>,
}

impl SplitOutput {
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

#[inline]
fn is_header(header_set: &BTreeSet<usize>, idx: usize) -> bool {
    header_set.contains(&(idx + 1))
}

/// 0-indexed ranges of the non-header runs of a buffer with `total_lines`
/// lines. Empty runs are omitted.
#[must_use]
pub fn section_ranges(total_lines: usize, header_set: &BTreeSet<usize>) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(header_set.len() + 1);
    let mut start = 0;
    for idx in 0..total_lines {
        if is_header(header_set, idx) {
            if idx > start {
                ranges.push(start..idx);
            }
            start = idx + 1;
        }
    }
    if start < total_lines {
        ranges.push(start..total_lines);
    }
    ranges
}

/// Whether `col` is a valid gutter column for every line of a section.
///
/// Each line must have whitespace at `col`, and at least one line must
/// have content beyond `col`.
#[must_use]
pub fn is_gutter_column<S: AsRef<str>>(lines: &[S], col: usize) -> bool {
    if col == 0 {
        return false;
    }
    let mut has_right_content = false;
    for line in lines {
        let bytes = line.as_ref().as_bytes();
        if !bytes.get(col).is_some_and(u8::is_ascii_whitespace) {
            return false;
        }
        if !has_right_content {
            has_right_content = bytes[col + 1..].iter().any(|b| !b.is_ascii_whitespace());
        }
    }
    has_right_content
}

/// Pick the split column for one section, 0 when there is none.
fn section_column<S: AsRef<str>>(lines: &[S], nominal_width: usize) -> usize {
    let max_len = lines.iter().map(|l| l.as_ref().len()).max().unwrap_or(0);
    let candidates = [nominal_width / 2, max_len / 2];
    for (attempt, &col) in candidates.iter().enumerate() {
        if attempt > 0 && col == candidates[0] {
            continue;
        }
        if is_gutter_column(lines, col) {
            return col;
        }
    }
    0
}

/// Compute one split column per line. Headers always get 0.
///
/// `header_set` holds 1-indexed header lines.
#[must_use]
pub fn compute_sections<S: AsRef<str>>(
    lines: &[S],
    header_set: &BTreeSet<usize>,
    nominal_width: usize,
) -> Vec<usize> {
    let mut columns = vec![0; lines.len()];
    for range in section_ranges(lines.len(), header_set) {
        let col = section_column(&lines[range.clone()], nominal_width);
        crate::trace!(
            start = range.start,
            end = range.end,
            column = col,
            "section split column"
        );
        if col > 0 {
            columns[range].fill(col);
        }
    }
    columns
}

/// Split one line at `col`.
///
/// Returns `(left, right, trims)`. A column of 0, or one that does not fall
/// on a character boundary, leaves the line whole on the left.
#[must_use]
pub fn split_line(line: &str, col: usize) -> (&str, &str, TrimInfo) {
    if col == 0 || !line.is_char_boundary(col.min(line.len())) {
        return (line, "", TrimInfo::default());
    }
    let (head, tail) = line.split_at(col.min(line.len()));
    let left = head.trim_end_matches(|c: char| c.is_ascii_whitespace());
    let right = tail.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let trims = TrimInfo {
        left_trim: col - left.len(),
        right_trim: tail.len() - right.len(),
    };
    (left, right, trims)
}

/// Split every line at its column.
///
/// Header lines are copied into both halves unchanged.
#[must_use]
pub fn split<S: AsRef<str>>(
    lines: &[S],
    split_columns: &[usize],
    header_set: &BTreeSet<usize>,
) -> SplitOutput {
    let mut out = SplitOutput {
        left: Vec::with_capacity(lines.len()),
        right: Vec::with_capacity(lines.len()),
        trims: Vec::with_capacity(lines.len()),
    };
    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_header(header_set, idx) {
            out.left.push(line.to_string());
            out.right.push(line.to_string());
            out.trims.push(TrimInfo::default());
            continue;
        }
        let col = split_columns.get(idx).copied().unwrap_or(0);
        let (left, right, trims) = split_line(line, col);
        out.left.push(left.to_string());
        out.right.push(right.to_string());
        out.trims.push(trims);
    }
    out
}

/// Map one line's spans onto its two halves.
#[must_use]
pub fn remap_line_spans(spans: &[StyleSpan], col: usize, trims: TrimInfo) -> (Spans, Spans) {
    if col == 0 {
        return (spans.iter().copied().collect(), Spans::new());
    }
    let left_len = col.saturating_sub(trims.left_trim);
    let right_origin = col + trims.right_trim;
    let mut left = Spans::new();
    let mut right = Spans::new();
    for span in spans {
        let end = span.end_col();
        let left_end = end.min(left_len);
        if span.start_col < left_end {
            left.push(StyleSpan::new(
                span.start_col,
                left_end - span.start_col,
                span.key,
            ));
        }
        let right_start = span.start_col.max(right_origin);
        if right_start < end {
            right.push(StyleSpan::new(
                right_start - right_origin,
                end - right_start,
                span.key,
            ));
        }
    }
    (left, right)
}

/// Remap every line's spans onto the split halves.
///
/// Left spans keep their offsets and are clipped to the trimmed left half.
/// Right spans shift left by `split_column + right_trim`. A span straddling
/// the split is cut in two. Spans covering only trimmed whitespace vanish.
/// Header spans are duplicated into both halves.
#[must_use]
pub fn remap_spans(
    spans: &[Spans],
    split_columns: &[usize],
    trims: &[TrimInfo],
    header_set: &BTreeSet<usize>,
) -> (Vec<Spans>, Vec<Spans>) {
    let mut left = Vec::with_capacity(spans.len());
    let mut right = Vec::with_capacity(spans.len());
    for (idx, line_spans) in spans.iter().enumerate() {
        if is_header(header_set, idx) {
            left.push(line_spans.clone());
            right.push(line_spans.clone());
            continue;
        }
        let col = split_columns.get(idx).copied().unwrap_or(0);
        let trim = trims.get(idx).copied().unwrap_or_default();
        let (l, r) = remap_line_spans(line_spans, col, trim);
        left.push(l);
        right.push(r);
    }
    (left, right)
}
