#![forbid(unsafe_code)]

//! File header classifier.
//!
//! Difftastic announces each file with a banner line:
//!
//! ```text
//! src/app.ts --- TypeScript
//! lua/plugins/diff.lua --- 1/10 --- Lua
//! ```
//!
//! Grammar: `<filename> --- [<n>/<m> ---] <language>`. Diff content
//! frequently contains dashes and digits, so a banner is only accepted when
//! every validation rule holds; anything else is ordinary content.

use std::collections::BTreeSet;
use std::fmt;

use crate::line_number;

const SEPARATOR: &str = "---";

/// Position of a file within a multi-file diff (`n/m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub current: u32,
    pub of: u32,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.of)
    }
}

/// One file banner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderRecord {
    /// 1-indexed line of the banner.
    pub line: usize,
    pub filename: String,
    pub language: Option<String>,
    pub step: Option<Step>,
}

/// Try to read a banner from one clean line.
///
/// `line` is the 1-indexed line number stored in the record.
#[must_use]
pub fn parse_header(text: &str, line: usize) -> Option<HeaderRecord> {
    let sep = text.find(SEPARATOR)?;

    // Numbered content lines take priority over the banner grammar.
    if line_number::is_line_number_only(text) || line_number::starts_with_line_number(text) {
        return None;
    }

    let filename = text[..sep].trim();
    if !is_plausible_filename(filename) {
        return None;
    }

    let rest = text[sep + SEPARATOR.len()..].trim();
    let (step, language) = match split_step(rest) {
        Some((step, language)) => (Some(step), language),
        None => (None, rest),
    };

    if !language.is_empty() && language.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if language.is_empty() && step.is_none() {
        return None;
    }

    Some(HeaderRecord {
        line,
        filename: filename.to_string(),
        language: (!language.is_empty()).then(|| language.to_string()),
        step,
    })
}

/// Split `n/m --- language` into its step and the language text.
fn split_step(rest: &str) -> Option<(Step, &str)> {
    let (counter, after) = rest.split_once(SEPARATOR)?;
    let (current, of) = counter.trim().split_once('/')?;
    let current = parse_digits(current)?;
    let of = parse_digits(of)?;
    Some((Step { current, of }, after.trim()))
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A banner filename has a path separator, an extension, or starts with an
/// uppercase letter (`Makefile`, `Dockerfile`).
fn is_plausible_filename(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if name.contains('/') || name.contains('\\') {
        return true;
    }
    if first.is_ascii_uppercase() {
        return true;
    }
    has_extension(name)
}

fn has_extension(name: &str) -> bool {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        None => false,
    }
}

/// Banners found in a buffer, with fast membership lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderIndex {
    headers: Vec<HeaderRecord>,
    header_set: BTreeSet<usize>,
}

impl HeaderIndex {
    /// Build an index from records in ascending line order.
    ///
    /// Records on line 0 and records that would break the ordering are
    /// dropped.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = HeaderRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if record.line == 0
                || index.headers.last().is_some_and(|last| last.line >= record.line)
            {
                continue;
            }
            index.header_set.insert(record.line);
            index.headers.push(record);
        }
        index
    }

    /// Headers in ascending line order.
    #[must_use]
    pub fn headers(&self) -> &[HeaderRecord] {
        &self.headers
    }

    /// Set of 1-indexed header lines.
    #[must_use]
    pub fn header_set(&self) -> &BTreeSet<usize> {
        &self.header_set
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Whether a 1-indexed line is a banner.
    #[must_use]
    pub fn is_header(&self, line: usize) -> bool {
        self.header_set.contains(&line)
    }

    /// The last banner at or before `line`.
    #[must_use]
    pub fn header_at_or_before(&self, line: usize) -> Option<&HeaderRecord> {
        let count = self.headers.partition_point(|h| h.line <= line);
        count.checked_sub(1).map(|idx| &self.headers[idx])
    }

    /// The first banner strictly after `line`.
    #[must_use]
    pub fn next_header_after(&self, line: usize) -> Option<&HeaderRecord> {
        let idx = self.headers.partition_point(|h| h.line <= line);
        self.headers.get(idx)
    }
}

/// Classify every line of a buffer.
#[must_use]
pub fn classify<S: AsRef<str>>(lines: &[S]) -> HeaderIndex {
    let index = HeaderIndex::from_records(
        lines
            .iter()
            .enumerate()
            .filter_map(|(idx, text)| parse_header(text.as_ref(), idx + 1)),
    );
    crate::debug!(headers = index.len(), lines = lines.len(), "classified headers");
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_lines_are_never_headers() {
        assert!(classify(&["1049", "1050", "100"]).is_empty());
    }

    #[test]
    fn plain_banner() {
        let index = classify(&["src/app.ts --- TypeScript"]);
        assert_eq!(
            index.headers(),
            &[HeaderRecord {
                line: 1,
                filename: "src/app.ts".into(),
                language: Some("TypeScript".into()),
                step: None,
            }]
        );
    }

    #[test]
    fn banner_with_step() {
        let header = parse_header("lua/plugins/diff.lua --- 1/10 --- Lua", 3).unwrap();
        assert_eq!(header.step, Some(Step { current: 1, of: 10 }));
        assert_eq!(header.language.as_deref(), Some("Lua"));
        assert_eq!(header.filename, "lua/plugins/diff.lua");
        assert_eq!(header.line, 3);
    }

    #[test]
    fn bare_lowercase_word_is_rejected() {
        assert!(parse_header("filename --- Text", 1).is_none());
        assert!(parse_header("x = a --- b", 1).is_none());
    }

    #[test]
    fn filename_shapes() {
        assert!(parse_header("Makefile --- Make", 1).is_some());
        assert!(parse_header("README.md --- Markdown", 1).is_some());
        assert!(parse_header(".gitignore --- Text", 1).is_some());
        assert!(parse_header("docs\\guide --- Text", 1).is_some());
        assert!(parse_header("my notes/todo list.txt --- Text", 1).is_some());
        assert!(parse_header("trailing. --- Text", 1).is_none());
        assert!(parse_header(" --- Text", 1).is_none());
    }

    #[test]
    fn numeric_language_is_rejected() {
        assert!(parse_header("foo.rs --- 42", 1).is_none());
    }

    #[test]
    fn numbered_content_is_rejected() {
        assert!(parse_header("12 src/x.rs --- Rust", 1).is_none());
        assert!(parse_header(".. 20 a.lua --- Lua", 1).is_none());
        assert!(parse_header("12 13 -- x --- y.rs", 1).is_none());
    }

    #[test]
    fn language_with_details() {
        let header =
            parse_header("big.json --- Text (2 JSON parse errors, exceeded limit)", 1).unwrap();
        assert_eq!(
            header.language.as_deref(),
            Some("Text (2 JSON parse errors, exceeded limit)")
        );
    }

    #[test]
    fn missing_language_needs_step() {
        assert!(parse_header("a.rs ---", 1).is_none());
        let header = parse_header("a.rs --- 2/3 ---", 1).unwrap();
        assert_eq!(header.language, None);
        assert_eq!(header.step, Some(Step { current: 2, of: 3 }));
    }

    #[test]
    fn index_lookups() {
        let lines = [
            "a.rs --- Rust",
            "1 fn a() {}",
            "2 fn b() {}",
            "b.rs --- Rust",
            "1 x",
        ];
        let index = classify(&lines);
        assert_eq!(index.len(), 2);
        assert!(index.is_header(1));
        assert!(index.is_header(4));
        assert!(!index.is_header(2));
        assert_eq!(index.header_at_or_before(3).map(|h| h.line), Some(1));
        assert_eq!(index.header_at_or_before(4).map(|h| h.line), Some(4));
        assert_eq!(index.next_header_after(1).map(|h| h.line), Some(4));
        assert!(index.next_header_after(4).is_none());
    }

    #[test]
    fn from_records_keeps_order() {
        let record = |line| HeaderRecord {
            line,
            filename: "a.rs".into(),
            language: None,
            step: None,
        };
        let index = HeaderIndex::from_records([record(0), record(5), record(3), record(9)]);
        let lines: Vec<usize> = index.headers().iter().map(|h| h.line).collect();
        assert_eq!(lines, vec![5, 9]);
        assert_eq!(index.header_set().len(), 2);
        assert!(!index.is_header(0));
    }
}
