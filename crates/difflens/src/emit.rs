#![forbid(unsafe_code)]

//! SGR generation for concrete styles.
//!
//! Pure byte generation; callers track state. Spans are always closed with
//! a reset, so no attribute-off codes are needed.
//!
//! | Sequence | Description |
//! |----------|-------------|
//! | `ESC [ 0 m` | reset |
//! | `ESC [ n ; n m` | attributes 1 to 4 |
//! | `ESC [ 38 ; 2 ; r ; g ; b m` | true color foreground |
//! | `ESC [ 48 ; 2 ; r ; g ; b m` | true color background |

use std::io::{self, Write};

use difflens_core::StyleSpan;
use difflens_style::{ConcreteStyle, FormatCache, Rgb, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Ordered table of (flag, on code).
const FLAG_TABLE: [(StyleFlags, u8); 4] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
];

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

#[inline]
fn write_u8_dec(buf: &mut [u8], n: u8) -> usize {
    if n >= 100 {
        buf[0] = b'0' + n / 100;
        buf[1] = b'0' + (n / 10) % 10;
        buf[2] = b'0' + n % 10;
        3
    } else if n >= 10 {
        buf[0] = b'0' + n / 10;
        buf[1] = b'0' + n % 10;
        2
    } else {
        buf[0] = b'0' + n;
        1
    }
}

/// Write one SGR sequence enabling every set flag.
///
/// Emits nothing for empty flags.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }
    let mut buf = [0u8; 16];
    buf[0] = 0x1b;
    buf[1] = b'[';
    let mut idx = 2;
    let mut first = true;
    for (flag, code) in FLAG_TABLE {
        if flags.contains(flag) {
            if !first {
                buf[idx] = b';';
                idx += 1;
            }
            idx += write_u8_dec(&mut buf[idx..], code);
            first = false;
        }
    }
    buf[idx] = b'm';
    idx += 1;
    w.write_all(&buf[..idx])
}

/// Write SGR sequence for true color foreground: `CSI 38;2;r;g;b m`
pub fn sgr_fg_rgb<W: Write>(w: &mut W, color: Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

/// Write SGR sequence for true color background: `CSI 48;2;r;g;b m`
pub fn sgr_bg_rgb<W: Write>(w: &mut W, color: Rgb) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}

/// Write the sequences that switch to `style`.
pub fn sgr_style<W: Write>(w: &mut W, style: &ConcreteStyle) -> io::Result<()> {
    sgr_flags(w, style.flags)?;
    if let Some(fg) = style.fg {
        sgr_fg_rgb(w, fg)?;
    }
    if let Some(bg) = style.bg {
        sgr_bg_rgb(w, bg)?;
    }
    Ok(())
}

/// Write `text` with its spans drawn through `cache`.
///
/// Without `color` the clean text is written unchanged.
pub fn write_styled<W: Write>(
    w: &mut W,
    text: &str,
    spans: &[StyleSpan],
    cache: &mut FormatCache,
    color: bool,
) -> io::Result<()> {
    if !color || spans.is_empty() {
        return w.write_all(text.as_bytes());
    }
    let mut cursor = 0;
    for span in spans {
        let start = span.start_col.min(text.len());
        let end = span.end_col().min(text.len());
        if start < cursor || start >= end {
            continue;
        }
        w.write_all(&text.as_bytes()[cursor..start])?;
        sgr_style(w, cache.get_or_build(span.key))?;
        w.write_all(&text.as_bytes()[start..end])?;
        sgr_reset(w)?;
        cursor = end;
    }
    w.write_all(&text.as_bytes()[cursor..])
}
