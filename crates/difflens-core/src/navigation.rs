#![forbid(unsafe_code)]

//! Header navigation for one display surface.
//!
//! The state is either "no selection" (`current_index == 0`) or a 1-based
//! index into the header list. `next`/`prev` wrap around, `first`/`last`
//! jump to the ends. Every transition places the cursor on the target
//! header at the goal column clamped to the line length. When the cursor
//! has moved since the last placement, its column becomes the new goal
//! first; otherwise the goal survives clamping on short headers.
//!
//! With no headers every transition is a no-op.

use crate::header::{HeaderIndex, HeaderRecord};
use crate::surface::{Cursor, Surface};

/// Navigation state over the headers of one loaded diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    headers: Vec<HeaderRecord>,
    current_index: usize,
    goal_column: usize,
    /// Where the last transition left the cursor.
    placed: Option<Cursor>,
}

impl NavigationState {
    /// Create a state with no selection.
    #[must_use]
    pub fn new(headers: Vec<HeaderRecord>) -> Self {
        Self {
            headers,
            current_index: 0,
            goal_column: 0,
            placed: None,
        }
    }

    #[must_use]
    pub fn from_index(index: &HeaderIndex) -> Self {
        Self::new(index.headers().to_vec())
    }

    #[must_use]
    pub fn headers(&self) -> &[HeaderRecord] {
        &self.headers
    }

    /// 1-based index of the selected header, 0 when none.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub const fn goal_column(&self) -> usize {
        self.goal_column
    }

    /// The selected header.
    #[must_use]
    pub fn current_header(&self) -> Option<&HeaderRecord> {
        self.current_index
            .checked_sub(1)
            .and_then(|idx| self.headers.get(idx))
    }

    /// Move to the next header, wrapping to the first.
    pub fn next<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<&HeaderRecord> {
        let len = self.headers.len();
        let target = if self.current_index >= len {
            1
        } else {
            self.current_index + 1
        };
        self.go_to(surface, target)
    }

    /// Move to the previous header, wrapping to the last.
    pub fn prev<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<&HeaderRecord> {
        let len = self.headers.len();
        let target = if self.current_index <= 1 {
            len
        } else {
            self.current_index - 1
        };
        self.go_to(surface, target)
    }

    pub fn first<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<&HeaderRecord> {
        self.go_to(surface, 1)
    }

    pub fn last<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<&HeaderRecord> {
        let len = self.headers.len();
        self.go_to(surface, len)
    }

    /// Resync the selection to the last header at or before `line`.
    pub fn update_from_position(&mut self, line: usize) {
        self.current_index = self.headers.partition_point(|h| h.line <= line);
    }

    fn go_to<S: Surface + ?Sized>(&mut self, surface: &mut S, target: usize) -> Option<&HeaderRecord> {
        if self.headers.is_empty() {
            return None;
        }
        let cursor = surface.cursor();
        if self.placed != Some(cursor) {
            self.goal_column = cursor.col;
        }
        self.current_index = target;
        let header = &self.headers[target - 1];
        let col = self.goal_column.min(surface.line_len(header.line));
        surface.set_cursor(Cursor::new(header.line, col));
        self.placed = Some(surface.cursor());
        crate::trace!(
            index = target,
            line = header.line,
            col,
            "navigated to header"
        );
        Some(header)
    }
}
