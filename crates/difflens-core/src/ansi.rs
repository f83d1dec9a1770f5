#![forbid(unsafe_code)]

//! ANSI stream parser.
//!
//! Converts one raw line of difftastic output into clean text plus style
//! spans. Only SGR sequences (`ESC [ params m`) are interpreted:
//!
//! | code | effect |
//! |------|--------|
//! | `0` (or no params) | reset color and attributes |
//! | `1` `2` `3` `4` | bold, dim, italic, underline |
//! | `30`–`37`, `90`–`97` | set the [`ColorClass`] |
//! | `38`/`48`/`58` `;5;n` or `;2;r;g;b` | skipped as a unit |
//! | anything else | ignored |
//!
//! Dim without an active color also selects [`ColorClass::Dim`], so dimmed
//! text stays visible on surfaces without a dim attribute.
//!
//! An escape that is not a well-formed SGR sequence (no `[`, a byte other
//! than a digit or `;` before the final `m`, or no final `m` at all) is
//! copied through as literal text. Parsing never fails.
//!
//! Each line is parsed independently: style state starts empty.

use std::borrow::Cow;

use difflens_style::{ColorClass, StyleFlags, StyleKey};
use memchr::memchr;
use smallvec::SmallVec;

const ESC: u8 = 0x1b;

/// Spans of one line. Most lines carry only a few.
pub type Spans = SmallVec<[StyleSpan; 4]>;

/// A styled byte range of a clean line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSpan {
    /// Byte offset into the clean text.
    pub start_col: usize,
    /// Length in bytes.
    pub length: usize,
    /// Composite style identity.
    pub key: StyleKey,
}

impl StyleSpan {
    #[must_use]
    pub const fn new(start_col: usize, length: usize, key: StyleKey) -> Self {
        Self {
            start_col,
            length,
            key,
        }
    }

    /// Exclusive end column.
    #[must_use]
    pub const fn end_col(&self) -> usize {
        self.start_col + self.length
    }

    #[must_use]
    pub const fn class(&self) -> Option<ColorClass> {
        self.key.class
    }
}

/// Result of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedLine {
    /// Escape-free text.
    pub text: String,
    /// Spans in emission order.
    pub spans: Spans,
}

impl ParsedLine {
    /// A line without styling.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Spans::new(),
        }
    }

    /// Whether any span marks added or removed text.
    #[must_use]
    pub fn has_change_marker(&self) -> bool {
        self.spans
            .iter()
            .any(|span| span.class().is_some_and(ColorClass::is_change_marker))
    }

    /// Re-encode the line with canonical SGR codes.
    ///
    /// Parsing the result yields the same text and spans.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + self.spans.len() * 12);
        let mut cursor = 0;
        for span in &self.spans {
            if span.start_col > cursor {
                out.push_str(&self.text[cursor..span.start_col]);
            }
            push_sgr(&mut out, &sgr_codes(span.key));
            out.push_str(&self.text[span.start_col..span.end_col()]);
            push_sgr(&mut out, &[0]);
            cursor = span.end_col();
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

fn push_sgr(out: &mut String, codes: &[u16]) {
    out.push('\x1b');
    out.push('[');
    for (idx, code) in codes.iter().enumerate() {
        if idx > 0 {
            out.push(';');
        }
        out.push_str(&code.to_string());
    }
    out.push('m');
}

/// Canonical SGR codes that reproduce `key` from a reset state.
#[must_use]
pub fn sgr_codes(key: StyleKey) -> SmallVec<[u16; 5]> {
    let mut codes = SmallVec::new();
    if let Some(class) = key.class {
        codes.push(match class {
            ColorClass::Add => 32,
            ColorClass::Delete => 31,
            ColorClass::Change => 33,
            ColorClass::Info => 34,
            ColorClass::Hint => 35,
            ColorClass::Dim => 90,
            ColorClass::Neutral => 37,
        });
    }
    for (flag, code) in [
        (StyleFlags::BOLD, 1),
        (StyleFlags::DIM, 2),
        (StyleFlags::ITALIC, 3),
        (StyleFlags::UNDERLINE, 4),
    ] {
        if key.flags.contains(flag) {
            codes.push(code);
        }
    }
    if codes.is_empty() {
        codes.push(0);
    }
    codes
}

/// Running SGR state while scanning a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SgrState {
    key: StyleKey,
}

impl SgrState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current composite style.
    #[must_use]
    pub const fn key(&self) -> StyleKey {
        self.key
    }

    /// Whether text emitted now should carry a span.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.key.is_active()
    }

    pub fn reset(&mut self) {
        self.key = StyleKey::PLAIN;
    }

    /// Apply the parameters of one SGR sequence, left to right.
    pub fn apply(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset();
            return;
        }
        let mut iter = params.iter().copied();
        while let Some(code) = iter.next() {
            match code {
                0 => self.reset(),
                38 | 48 | 58 => skip_extended_color(&mut iter),
                _ => {
                    if let Some(flag) = StyleFlags::from_sgr(code) {
                        self.key.flags.insert(flag);
                        if flag == StyleFlags::DIM && self.key.class.is_none() {
                            self.key.class = Some(ColorClass::Dim);
                        }
                    } else if let Some(class) = ColorClass::from_sgr(code) {
                        self.key.class = Some(class);
                    }
                }
            }
        }
    }
}

/// Consume the operands of `38;5;n` / `38;2;r;g;b` (and the 48/58 forms).
fn skip_extended_color(iter: &mut impl Iterator<Item = u16>) {
    let operands = match iter.next() {
        Some(5) => 1,
        Some(2) => 3,
        _ => 0,
    };
    for _ in 0..operands {
        if iter.next().is_none() {
            break;
        }
    }
}

/// Locate a well-formed SGR sequence starting at `esc`.
///
/// Returns the parameter byte range and the index just past the final `m`.
fn scan_sgr(bytes: &[u8], esc: usize) -> Option<(usize, usize, usize)> {
    if bytes.get(esc + 1) != Some(&b'[') {
        return None;
    }
    let start = esc + 2;
    let mut idx = start;
    while let Some(&b) = bytes.get(idx) {
        match b {
            b'0'..=b'9' | b';' => idx += 1,
            b'm' => return Some((start, idx, idx + 1)),
            _ => return None,
        }
    }
    None
}

/// Parse SGR parameter bytes (`digits` separated by `;`).
///
/// Empty fields count as `0`; values saturate at `u16::MAX`.
fn parse_params(bytes: &[u8]) -> SmallVec<[u16; 8]> {
    let mut out = SmallVec::new();
    if bytes.is_empty() {
        return out;
    }
    for field in bytes.split(|&b| b == b';') {
        let value = field.iter().fold(0u16, |acc, &b| {
            acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
        });
        out.push(value);
    }
    out
}

/// Parse one raw line into clean text and spans.
#[must_use]
pub fn parse_line(line: &str) -> ParsedLine {
    let bytes = line.as_bytes();
    let Some(first) = memchr(ESC, bytes) else {
        return ParsedLine::plain(line);
    };

    let mut text = String::with_capacity(line.len());
    let mut spans = Spans::new();
    let mut state = SgrState::new();
    let mut chunk_start = 0;
    let mut search = first;

    loop {
        let (params_start, params_end, next) = match scan_sgr(bytes, search) {
            Some(found) => found,
            None => {
                // Malformed: keep the ESC byte as text and look further.
                match memchr(ESC, &bytes[search + 1..]) {
                    Some(off) => {
                        search = search + 1 + off;
                        continue;
                    }
                    None => break,
                }
            }
        };

        emit_chunk(&mut text, &mut spans, &line[chunk_start..search], &state);
        state.apply(&parse_params(&bytes[params_start..params_end]));
        chunk_start = next;

        match memchr(ESC, &bytes[next..]) {
            Some(off) => search = next + off,
            None => break,
        }
    }

    emit_chunk(&mut text, &mut spans, &line[chunk_start..], &state);
    ParsedLine { text, spans }
}

fn emit_chunk(text: &mut String, spans: &mut Spans, chunk: &str, state: &SgrState) {
    if chunk.is_empty() {
        return;
    }
    let start = text.len();
    text.push_str(chunk);
    if state.is_active() {
        spans.push(StyleSpan::new(start, chunk.len(), state.key()));
    }
}

/// Parse every line of a buffer.
#[must_use]
pub fn parse_lines<I, S>(lines: I) -> Vec<ParsedLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Remove SGR sequences, keeping malformed escapes as text.
#[must_use]
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    if memchr(ESC, line.as_bytes()).is_none() {
        return Cow::Borrowed(line);
    }
    Cow::Owned(parse_line(line).text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(class: Option<ColorClass>, flags: StyleFlags) -> StyleKey {
        StyleKey::new(class, flags)
    }

    #[test]
    fn plain_line_is_unchanged() {
        let parsed = parse_line("fn main() {}");
        assert_eq!(parsed.text, "fn main() {}");
        assert!(parsed.spans.is_empty());
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn colored_chunk_gets_span() {
        let parsed = parse_line("a \x1b[31mred\x1b[0m b");
        assert_eq!(parsed.text, "a red b");
        assert_eq!(
            parsed.spans.as_slice(),
            &[StyleSpan::new(2, 3, StyleKey::class(ColorClass::Delete))]
        );
    }

    #[test]
    fn attributes_combine_into_one_key() {
        let parsed = parse_line("\x1b[1;3;92mx\x1b[4my");
        let bold_italic = StyleFlags::BOLD | StyleFlags::ITALIC;
        assert_eq!(parsed.spans[0].key, key(Some(ColorClass::Add), bold_italic));
        assert_eq!(
            parsed.spans[1].key,
            key(Some(ColorClass::Add), bold_italic | StyleFlags::UNDERLINE)
        );
    }

    #[test]
    fn dim_without_color_selects_dim_class() {
        let parsed = parse_line("\x1b[2m12\x1b[0m");
        assert_eq!(parsed.spans[0].key, key(Some(ColorClass::Dim), StyleFlags::DIM));
    }

    #[test]
    fn dim_keeps_existing_color() {
        let parsed = parse_line("\x1b[33;2mx");
        assert_eq!(
            parsed.spans[0].key,
            key(Some(ColorClass::Change), StyleFlags::DIM)
        );
    }

    #[test]
    fn bold_only_still_emits_span() {
        let parsed = parse_line("\x1b[1msrc/app.ts\x1b[0m --- TypeScript");
        assert_eq!(parsed.text, "src/app.ts --- TypeScript");
        assert_eq!(parsed.spans.len(), 1);
        assert_eq!(parsed.spans[0].key, key(None, StyleFlags::BOLD));
    }

    #[test]
    fn unknown_codes_change_nothing() {
        let parsed = parse_line("\x1b[7;39;45mx\x1b[0m");
        assert_eq!(parsed.text, "x");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn extended_color_operands_are_skipped() {
        // 38;5;32 must not read as "green"; 38;2;1;31;4 must not read as red.
        let parsed = parse_line("\x1b[38;5;32mx\x1b[38;2;1;31;4my");
        assert_eq!(parsed.text, "xy");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn empty_params_reset() {
        let parsed = parse_line("\x1b[31ma\x1b[mb");
        assert_eq!(parsed.spans.len(), 1);
        assert_eq!(parsed.text, "ab");
    }

    #[test]
    fn empty_chunks_emit_nothing() {
        let parsed = parse_line("\x1b[31m\x1b[1m\x1b[0m");
        assert_eq!(parsed.text, "");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn unterminated_escape_is_literal() {
        let parsed = parse_line("abc\x1b[31");
        assert_eq!(parsed.text, "abc\x1b[31");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn malformed_escape_is_literal_but_later_ones_apply() {
        let parsed = parse_line("\x1b[3xq\x1b[32mok");
        assert_eq!(parsed.text, "\x1b[3xqok");
        assert_eq!(parsed.spans[0].start_col, 5);
        assert_eq!(parsed.spans[0].class(), Some(ColorClass::Add));
    }

    #[test]
    fn lone_escape_is_literal() {
        let parsed = parse_line("a\x1bb");
        assert_eq!(parsed.text, "a\x1bb");
    }

    #[test]
    fn multibyte_text_offsets_are_bytes() {
        let parsed = parse_line("é\x1b[32mü\x1b[0m");
        assert_eq!(parsed.spans[0], StyleSpan::new(2, 2, StyleKey::class(ColorClass::Add)));
    }

    #[test]
    fn huge_params_saturate() {
        let parsed = parse_line("\x1b[99999999999mx");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn re_encoding_round_trips() {
        let parsed = parse_line("\x1b[2m1 \x1b[0m\x1b[1;31mfoo\x1b[0m bar \x1b[4;96mbaz");
        assert_eq!(parse_line(&parsed.to_ansi()), parsed);
    }

    #[test]
    fn change_marker_detection() {
        assert!(parse_line("\x1b[92m+x").has_change_marker());
        assert!(!parse_line("\x1b[2m12").has_change_marker());
    }
}
