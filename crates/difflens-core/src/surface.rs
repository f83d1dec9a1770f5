#![forbid(unsafe_code)]

//! Display surface abstraction.
//!
//! Navigation and jump queries need a cursor and line lengths from whatever
//! shows the diff. [`Surface`] is that seam; [`MemorySurface`] is a headless
//! implementation.

/// Cursor position on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cursor {
    /// Line (1-indexed).
    pub line: usize,
    /// Byte column (0-indexed).
    pub col: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Something that displays lines and owns a cursor.
pub trait Surface {
    /// Current cursor position.
    fn cursor(&self) -> Cursor;

    /// Move the cursor. Implementations clamp out-of-range positions.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Length in bytes of a 1-indexed line, 0 when it does not exist.
    fn line_len(&self, line: usize) -> usize;

    /// Number of lines shown.
    fn line_count(&self) -> usize;
}

/// A surface backed by a vector of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    lines: Vec<String>,
    cursor: Cursor,
}

impl MemorySurface {
    /// Create a surface with the cursor on the first line.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let cursor = Cursor::new(usize::from(!lines.is_empty()), 0);
        Self { lines, cursor }
    }

    /// Text of a 1-indexed line.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Surface for MemorySurface {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        let line = cursor.line.clamp(1, self.lines.len().max(1));
        let col = cursor.col.min(self.line_len(line));
        self.cursor = Cursor::new(line, col);
    }

    fn line_len(&self, line: usize) -> usize {
        self.line(line).map_or(0, str::len)
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_line() {
        let surface = MemorySurface::new(["a", "bb"]);
        assert_eq!(surface.cursor(), Cursor::new(1, 0));
        assert_eq!(MemorySurface::default().cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn set_cursor_clamps() {
        let mut surface = MemorySurface::new(["abc", "de"]);
        surface.set_cursor(Cursor::new(2, 10));
        assert_eq!(surface.cursor(), Cursor::new(2, 2));
        surface.set_cursor(Cursor::new(9, 1));
        assert_eq!(surface.cursor(), Cursor::new(2, 1));
        surface.set_cursor(Cursor::new(0, 1));
        assert_eq!(surface.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn line_lookup() {
        let surface = MemorySurface::new(["abc"]);
        assert_eq!(surface.line(1), Some("abc"));
        assert_eq!(surface.line(0), None);
        assert_eq!(surface.line_len(2), 0);
        assert_eq!(surface.line_count(), 1);
    }
}
