//! Property-based invariant tests for the parsing pipeline.
//!
//! 1. Lines without ESC parse to themselves with no spans.
//! 2. The parser never panics and spans stay inside the clean text.
//! 3. Re-encoding parsed SGR output and parsing again is stable.
//! 4. Lines made only of line-number tokens are never headers.
//! 5. An accepted split column is whitespace (or past the end) on every
//!    line of its section.
//! 6. Single-column sections split into `left == line`, `right == ""`.
//! 7. Remapped spans stay inside their half.
//! 8. The resolver never panics.

use std::collections::BTreeSet;

use difflens_core::{
    DiffDocument, classify, compute_sections, line_number, parse_line, remap_spans, split,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn sgr_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::from("\x1b[0m")),
        Just(String::from("\x1b[m")),
        Just(String::from("\x1b[1m")),
        Just(String::from("\x1b[2m")),
        Just(String::from("\x1b[3m")),
        Just(String::from("\x1b[4m")),
        (30u16..=37).prop_map(|c| format!("\x1b[{c}m")),
        (90u16..=97).prop_map(|c| format!("\x1b[{c}m")),
        (0u16..=255).prop_map(|n| format!("\x1b[38;5;{n}m")),
        (1u16..=4, 30u16..=37).prop_map(|(a, c)| format!("\x1b[{a};{c}m")),
    ]
}

fn colored_line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![sgr_strategy(), "[a-z0-9 .(){}-]{0,8}"],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

fn number_token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100_000).prop_map(|n| n.to_string()),
        (0u32..100_000).prop_map(|n| format!(". {n}")),
        (2usize..4, 0u32..100_000).prop_map(|(d, n)| format!("{} {n}", ".".repeat(d))),
    ]
}

fn number_only_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        number_token_strategy(),
        (number_token_strategy(), number_token_strategy()).prop_map(|(a, b)| format!("{a} {b}")),
    ]
}

fn section_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,40}", 1..12)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. ANSI parser
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plain_lines_are_unchanged(line in "[^\x1b]{0,80}") {
        let parsed = parse_line(&line);
        prop_assert_eq!(&parsed.text, &line);
        prop_assert!(parsed.spans.is_empty());
    }

    #[test]
    fn parser_never_panics(line in "(\x1b|\\[|;|m|[0-9]|[a-z ]){0,60}") {
        let parsed = parse_line(&line);
        for span in &parsed.spans {
            prop_assert!(span.length > 0);
            prop_assert!(span.end_col() <= parsed.text.len());
        }
    }

    #[test]
    fn spans_are_ordered_and_in_bounds(line in colored_line_strategy()) {
        let parsed = parse_line(&line);
        let mut last_end = 0;
        for span in &parsed.spans {
            prop_assert!(span.start_col >= last_end, "{:?}", parsed.spans);
            prop_assert!(span.end_col() <= parsed.text.len());
            last_end = span.end_col();
        }
        prop_assert!(!parsed.text.contains('\x1b'));
    }

    #[test]
    fn reencode_is_stable(line in colored_line_strategy()) {
        let parsed = parse_line(&line);
        let reparsed = parse_line(&parsed.to_ansi());
        prop_assert_eq!(parsed, reparsed);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Header classifier
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn number_lines_are_never_headers(lines in prop::collection::vec(number_only_line_strategy(), 0..20)) {
        prop_assert!(classify(&lines).is_empty());
    }

    #[test]
    fn number_lines_with_dashes_are_never_headers(
        token in number_token_strategy(),
        tail in "[a-z./ ]{0,12}",
    ) {
        let line = format!("{token} {tail} --- Rust");
        prop_assert!(classify(&[line]).is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-7. Column-split engine
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accepted_column_is_gutter(lines in section_strategy(), width in 0usize..100) {
        let columns = compute_sections(&lines, &BTreeSet::new(), width);
        for (line, &col) in lines.iter().zip(&columns) {
            if col == 0 {
                continue;
            }
            prop_assert!(
                line.as_bytes().get(col).is_some_and(u8::is_ascii_whitespace),
                "column {} cuts {:?}", col, line
            );
        }
    }

    #[test]
    fn one_column_per_section(lines in section_strategy(), width in 0usize..100) {
        let columns = compute_sections(&lines, &BTreeSet::new(), width);
        prop_assert_eq!(columns.len(), lines.len());
        prop_assert!(columns.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn zero_column_keeps_lines(lines in section_strategy()) {
        let zeros = vec![0; lines.len()];
        let out = split(&lines, &zeros, &BTreeSet::new());
        for (idx, line) in lines.iter().enumerate() {
            prop_assert_eq!(&out.left[idx], line);
            prop_assert_eq!(out.right[idx].as_str(), "");
        }
    }

    #[test]
    fn remapped_spans_fit_their_half(
        lines in prop::collection::vec(colored_line_strategy(), 1..8),
        width in 0usize..60,
    ) {
        let doc = DiffDocument::from_lines(&lines);
        let clean = doc.clean_lines();
        let header_set = doc.headers().header_set();
        let columns = compute_sections(&clean, header_set, width);
        let out = split(&clean, &columns, header_set);
        let spans: Vec<_> = doc.lines().iter().map(|l| l.spans.clone()).collect();
        let (left, right) = remap_spans(&spans, &columns, &out.trims, header_set);
        for idx in 0..lines.len() {
            for span in &left[idx] {
                prop_assert!(span.end_col() <= out.left[idx].len());
            }
            for span in &right[idx] {
                prop_assert!(span.end_col() <= out.right[idx].len());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Line-number resolver
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolver_never_panics(line in "[0-9. a-z\t]{0,40}", col in prop::option::of(0usize..60)) {
        let _ = line_number::resolve(&line, col);
    }

    #[test]
    fn single_number_resolves(n in 0u32..1_000_000, rest in "[a-z(){} ]{0,20}") {
        let line = format!("{n} {rest}");
        prop_assert_eq!(line_number::resolve(&line, None), Some(n));
    }
}
