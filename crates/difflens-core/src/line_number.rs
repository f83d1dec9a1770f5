#![forbid(unsafe_code)]

//! Source line-number resolver.
//!
//! Difftastic prefixes content lines with line numbers in several layouts.
//! The forms below are tried in order; the first match wins:
//!
//! 1. two columns, cursor-aware: `12 left text    14 right text`
//!    (gutter of two or more whitespace characters; needs a cursor column)
//! 2. ellipsis prefix: `.. 20`, `... 645`
//! 3. single dot prefix: `. 10`
//! 4. pair at line start: `1249 1277 ...` (always the second number)
//! 5. single leading number: `42 ...`
//!
//! Leading indentation is skipped. A number only counts when followed by
//! whitespace or the end of the line, so `123abc` is never a line number.

/// Which layout a line matched, with the numbers it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Two independent columns; `right_start` is the byte column of the right number.
    TwoColumn {
        left: u32,
        right: u32,
        right_start: usize,
    },
    /// Collapsed context marker (`..`, `...`) followed by a number.
    Ellipsis(u32),
    /// Single-dot context line.
    Context(u32),
    /// Old and new numbers at the start of the line.
    Pair { old: u32, new: u32 },
    /// One leading number.
    Single(u32),
}

impl LineKind {
    /// The number to jump to for this layout.
    ///
    /// For [`LineKind::TwoColumn`] this needs the cursor column; without one
    /// the right (new-file) number is used.
    #[must_use]
    pub const fn number(&self, cursor_col: Option<usize>) -> u32 {
        match *self {
            Self::TwoColumn {
                left,
                right,
                right_start,
            } => match cursor_col {
                Some(col) if col < right_start => left,
                _ => right,
            },
            Self::Ellipsis(n) | Self::Context(n) | Self::Single(n) => n,
            Self::Pair { new, .. } => new,
        }
    }
}

/// Extract the most plausible source line number from a clean line.
#[must_use]
pub fn resolve(text: &str, cursor_col: Option<usize>) -> Option<u32> {
    classify_line(text, cursor_col).map(|kind| kind.number(cursor_col))
}

/// Determine which line-number layout `text` uses.
///
/// The two-column form is only considered when `cursor_col` is given.
#[must_use]
pub fn classify_line(text: &str, cursor_col: Option<usize>) -> Option<LineKind> {
    let bytes = text.as_bytes();
    if cursor_col.is_some()
        && let Some(kind) = two_column(bytes)
    {
        return Some(kind);
    }
    if let Some(kind) = dotted(bytes) {
        return Some(kind);
    }
    let start = skip_ws(bytes, 0);
    let (first, end) = read_number(bytes, start)?;
    if end < bytes.len() {
        let next = skip_ws(bytes, end);
        if let Some((second, _)) = read_number(bytes, next) {
            return Some(LineKind::Pair {
                old: first,
                new: second,
            });
        }
    }
    Some(LineKind::Single(first))
}

/// Whether `text` starts with a line-number prefix: one token (`1049`,
/// `. 10`, `.. 20`) or two tokens separated by a single space, followed by
/// whitespace or the end of the line.
///
/// Numbered diff content often contains dashes and digits; the header
/// classifier consults this before trying its own grammar.
#[must_use]
pub fn starts_with_line_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let start = skip_ws(bytes, 0);
    number_token(bytes, start).is_some()
}

/// Whether the whole of `text` (ignoring surrounding whitespace) is one
/// line-number token or two tokens separated by a single space.
#[must_use]
pub fn is_line_number_only(text: &str) -> bool {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let Some(end) = number_token(bytes, 0) else {
        return false;
    };
    if end == bytes.len() {
        return true;
    }
    bytes[end] == b' '
        && number_token(bytes, end + 1).is_some_and(|second_end| second_end == bytes.len())
}

/// Match one line-number token at `idx`: digits, or a dot run, whitespace
/// and digits. Returns the end of the token.
fn number_token(bytes: &[u8], idx: usize) -> Option<usize> {
    let dots = count_dots(bytes, idx);
    let digits_at = if dots > 0 {
        let after_dots = idx + dots;
        let after_ws = skip_ws(bytes, after_dots);
        if after_ws == after_dots {
            return None;
        }
        after_ws
    } else {
        idx
    };
    read_number(bytes, digits_at).map(|(_, end)| end)
}

fn two_column(bytes: &[u8]) -> Option<LineKind> {
    let start = skip_ws(bytes, 0);
    let (left, left_end) = read_number(bytes, start)?;
    let content_start = skip_ws(bytes, left_end);
    if content_start == left_end || content_start >= bytes.len() {
        return None;
    }

    // Pick the number preceded by the widest whitespace run; the gutter is
    // normally much wider than any run inside code.
    let mut best: Option<(usize, u32, usize)> = None;
    let mut idx = content_start;
    while idx < bytes.len() {
        if !is_ws(bytes[idx]) {
            idx += 1;
            continue;
        }
        let run_start = idx;
        idx = skip_ws(bytes, idx);
        let run = idx - run_start;
        if run < 2 {
            continue;
        }
        if let Some((right, _)) = read_number(bytes, idx)
            && best.is_none_or(|(widest, _, _)| run > widest)
        {
            best = Some((run, right, idx));
        }
    }

    best.map(|(_, right, right_start)| LineKind::TwoColumn {
        left,
        right,
        right_start,
    })
}

fn dotted(bytes: &[u8]) -> Option<LineKind> {
    let start = skip_ws(bytes, 0);
    let dots = count_dots(bytes, start);
    if dots == 0 {
        return None;
    }
    let after_dots = start + dots;
    let digits_at = skip_ws(bytes, after_dots);
    if digits_at == after_dots {
        return None;
    }
    let (number, _) = read_number(bytes, digits_at)?;
    Some(if dots == 1 {
        LineKind::Context(number)
    } else {
        LineKind::Ellipsis(number)
    })
}

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x0b | 0x0c)
}

fn skip_ws(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && is_ws(bytes[idx]) {
        idx += 1;
    }
    idx
}

fn count_dots(bytes: &[u8], idx: usize) -> usize {
    bytes
        .get(idx..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| b == b'.').count())
}

/// Read a decimal number at `idx` that is followed by whitespace or the end
/// of the line. Returns the value and the index after the digits.
fn read_number(bytes: &[u8], idx: usize) -> Option<(u32, usize)> {
    let rest = bytes.get(idx..)?;
    let len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let end = idx + len;
    if let Some(&next) = bytes.get(end)
        && !is_ws(next)
    {
        return None;
    }
    let mut value: u32 = 0;
    for &b in &rest[..len] {
        value = value.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some((value, end))
}
