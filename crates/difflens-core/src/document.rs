#![forbid(unsafe_code)]

//! Document pipeline.
//!
//! [`DiffDocument`] runs raw difftastic output through the parser and the
//! header classifier once, and answers split, navigation and jump queries
//! from the result. [`Session`] owns a document together with the theme and
//! format cache used to draw it. Reloading replaces the document and its
//! navigation state wholesale; there is no incremental re-parse.

use difflens_style::{
    ConcreteStyle, DiffTheme, FormatCache, StyleKey, StyleSheet, UnknownStyle,
};

use crate::ansi::{self, ParsedLine, Spans};
use crate::header::{self, HeaderIndex, HeaderRecord};
use crate::jump::{self, JumpTarget};
use crate::navigation::NavigationState;
use crate::split::{self, TrimInfo};
use crate::surface::MemorySurface;

/// Parsed diff output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    lines: Vec<ParsedLine>,
    headers: HeaderIndex,
}

impl DiffDocument {
    /// Parse raw output. Both `\n` and `\r\n` line endings are accepted.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_lines(raw.lines())
    }

    /// Parse a sequence of raw lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _span = crate::debug_span!("parse_document").entered();
        let lines = ansi::parse_lines(lines);
        let headers = header::classify(
            &lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        );
        crate::debug!(
            lines = lines.len(),
            headers = headers.len(),
            "parsed diff document"
        );
        Self { lines, headers }
    }

    #[must_use]
    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    /// A 1-indexed line.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&ParsedLine> {
        line.checked_sub(1).and_then(|idx| self.lines.get(idx))
    }

    /// Clean text of every line.
    #[must_use]
    pub fn clean_lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderIndex {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Split every section at its gutter.
    ///
    /// `nominal_width` is the terminal width the diff was rendered for.
    #[must_use]
    pub fn side_by_side(&self, nominal_width: usize) -> SplitView {
        let clean = self.clean_lines();
        let header_set = self.headers.header_set();
        let columns = split::compute_sections(&clean, header_set, nominal_width);
        let output = split::split(&clean, &columns, header_set);
        let spans: Vec<Spans> = self.lines.iter().map(|l| l.spans.clone()).collect();
        let (left_spans, right_spans) =
            split::remap_spans(&spans, &columns, &output.trims, header_set);
        SplitView {
            columns,
            left: output.left,
            right: output.right,
            trims: output.trims,
            left_spans,
            right_spans,
        }
    }

    /// Fresh navigation state over this document's headers.
    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        NavigationState::from_index(&self.headers)
    }

    /// A headless surface showing the clean text.
    #[must_use]
    pub fn surface(&self) -> MemorySurface {
        MemorySurface::new(self.lines.iter().map(|l| l.text.clone()))
    }

    /// See [`jump::resolve_jump`].
    #[must_use]
    pub fn jump(&self, line: usize, col: usize) -> Option<JumpTarget> {
        jump::resolve_jump(self, line, col)
    }
}

/// Side-by-side rendition of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitView {
    /// Split column per line, 0 for single-column lines and headers.
    pub columns: Vec<usize>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub trims: Vec<TrimInfo>,
    pub left_spans: Vec<Spans>,
    pub right_spans: Vec<Spans>,
}

impl SplitView {
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Whether any line was actually split.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.columns.iter().any(|&col| col > 0)
    }
}

/// A loaded diff with the theme and cache used to draw it.
#[derive(Debug, Clone)]
pub struct Session {
    theme: DiffTheme,
    sheet: StyleSheet,
    cache: FormatCache,
    missing: Vec<UnknownStyle>,
    document: DiffDocument,
    navigation: NavigationState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DiffTheme::default(), StyleSheet::with_defaults())
    }
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(theme: DiffTheme, sheet: StyleSheet) -> Self {
        let resolution = theme.resolve(&sheet);
        Self {
            theme,
            sheet,
            cache: FormatCache::new(resolution.theme),
            missing: resolution.missing,
            document: DiffDocument::default(),
            navigation: NavigationState::default(),
        }
    }

    /// Replace the document with freshly parsed output.
    pub fn reload(&mut self, raw: &str) {
        self.document = DiffDocument::parse(raw);
        self.navigation = self.document.navigation();
    }

    /// Switch themes. Every cached style is dropped.
    pub fn set_theme(&mut self, theme: DiffTheme) {
        self.theme = theme;
        self.recompute();
    }

    /// Switch style sheets. Every cached style is dropped.
    pub fn set_stylesheet(&mut self, sheet: StyleSheet) {
        self.sheet = sheet;
        self.recompute();
    }

    fn recompute(&mut self) {
        let resolution = self.theme.resolve(&self.sheet);
        for missing in &resolution.missing {
            crate::warn!(group = %missing.0, "style group not defined, using fallback");
        }
        self.missing = resolution.missing;
        self.cache.set_theme(resolution.theme);
    }

    /// Concrete style for a span key.
    pub fn style(&mut self, key: StyleKey) -> &ConcreteStyle {
        self.cache.get_or_build(key)
    }

    #[must_use]
    pub fn theme(&self) -> &DiffTheme {
        &self.theme
    }

    #[must_use]
    pub fn stylesheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Groups the current theme references but the sheet lacks.
    #[must_use]
    pub fn missing_styles(&self) -> &[UnknownStyle] {
        &self.missing
    }

    #[must_use]
    pub fn cache(&self) -> &FormatCache {
        &self.cache
    }

    #[must_use]
    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    /// Borrow the document and the cache together for drawing.
    pub fn draw_parts(&mut self) -> (&DiffDocument, &mut FormatCache) {
        (&self.document, &mut self.cache)
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationState {
        &mut self.navigation
    }

    /// The header the navigation state has selected.
    #[must_use]
    pub fn current_header(&self) -> Option<&HeaderRecord> {
        self.navigation.current_header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use difflens_style::{ColorClass, StyleRef, themes};

    const RAW: &str = "a.rs --- 1/2 --- Rust\r\n\
                       1 \x1b[31mold\x1b[0m      1 \x1b[32mnew\x1b[0m\r\n\
                       2 same       2 same\r\n\
                       b.rs --- 2/2 --- Rust\r\n\
                       1 xyz";

    #[test]
    fn parse_strips_and_classifies() {
        let doc = DiffDocument::parse(RAW);
        assert_eq!(doc.len(), 5);
        assert_eq!(doc.line(2).map(|l| l.text.as_str()), Some("1 old      1 new"));
        assert_eq!(doc.headers().len(), 2);
        assert!(doc.line(0).is_none());
    }

    #[test]
    fn side_by_side_splits_and_remaps() {
        let doc = DiffDocument::parse(RAW);
        let view = doc.side_by_side(16);
        assert!(view.is_split());
        assert_eq!(view.columns, vec![0, 8, 8, 0, 0]);
        assert_eq!(view.left[1], "1 old");
        assert_eq!(view.right[1], "1 new");
        assert_eq!(view.left[0], view.right[0]);
        assert_eq!(view.left_spans[1][0].start_col, 2);
        assert_eq!(view.left_spans[1][0].class(), Some(ColorClass::Delete));
        assert_eq!(view.right_spans[1][0].start_col, 2);
        assert_eq!(view.right_spans[1][0].class(), Some(ColorClass::Add));
        assert_eq!(view.right[4], "");
    }

    #[test]
    fn session_reload_replaces_navigation() {
        let mut session = Session::default();
        session.reload(RAW);
        let mut surface = session.document().surface();
        session.navigation_mut().last(&mut surface);
        assert_eq!(session.current_header().map(|h| h.line), Some(4));

        session.reload("c.rs --- Rust\n1 z");
        assert!(session.current_header().is_none());
        assert_eq!(session.navigation().headers().len(), 1);
    }

    #[test]
    fn theme_change_clears_cache() {
        let mut session = Session::new(themes::dark(), StyleSheet::new());
        let key = StyleKey::class(ColorClass::Add);
        let before = session.style(key).fg;
        assert_eq!(session.cache().len(), 1);
        session.set_theme(themes::light());
        assert!(session.cache().is_empty());
        assert_ne!(session.style(key).fg, before);
    }

    #[test]
    fn missing_groups_are_reported() {
        let theme = DiffTheme::builder()
            .style(ColorClass::Add, StyleRef::named("NoSuchGroup"))
            .build();
        let session = Session::new(theme, StyleSheet::with_defaults());
        assert_eq!(session.missing_styles(), &[UnknownStyle("NoSuchGroup".into())]);
    }

    #[test]
    fn jump_through_document() {
        let doc = DiffDocument::parse(RAW);
        let target = doc.jump(1, 0).unwrap();
        assert_eq!(target.header.filename, "a.rs");
        assert_eq!(target.source_line, 1);
    }
}
