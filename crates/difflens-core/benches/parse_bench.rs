//! Benchmarks for the parsing pipeline.
//!
//! Run with: cargo bench -p difflens-core

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use difflens_core::{DiffDocument, parse_line};
use std::hint::black_box;

// =============================================================================
// Test Data
// =============================================================================

/// Plain content line without escapes.
fn plain_line(len: usize) -> String {
    "let value = compute(left, right); "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Content line with a color change every few words.
fn colored_line(len: usize) -> String {
    let mut out = String::new();
    let mut visible = 0;
    let codes = ["\x1b[31m", "\x1b[32;1m", "\x1b[0m", "\x1b[2m", "\x1b[93;4m"];
    for (idx, word) in ["fn", "main", "()", "{", "x", "=", "42;", "}"]
        .iter()
        .cycle()
        .enumerate()
    {
        if visible >= len {
            break;
        }
        out.push_str(codes[idx % codes.len()]);
        out.push_str(word);
        out.push(' ');
        visible += word.len() + 1;
    }
    out
}

/// A side-by-side diff of `files` files.
fn side_by_side_diff(files: usize) -> String {
    let mut out = String::new();
    for file in 1..=files {
        out.push_str(&format!(
            "\x1b[1msrc/file_{file}.rs\x1b[0m --- {file}/{files} --- Rust\n"
        ));
        for line in 1..=40 {
            out.push_str(&format!(
                "{line:>3} \x1b[31mold_{line}()\x1b[0m{pad}{line:>3} \x1b[32mnew_{line}()\x1b[0m\n",
                pad = " ".repeat(30)
            ));
        }
    }
    out
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line/plain");
    for len in [16, 80, 240] {
        let text = plain_line(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| parse_line(black_box(text)));
        });
    }
    group.finish();
}

fn bench_parse_colored(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line/colored");
    for len in [16, 80, 240] {
        let text = colored_line(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| parse_line(black_box(text)));
        });
    }
    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    for files in [1, 10, 50] {
        let raw = side_by_side_diff(files);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", files), &raw, |b, raw| {
            b.iter(|| DiffDocument::parse(black_box(raw)));
        });
        let doc = DiffDocument::parse(&raw);
        group.bench_with_input(BenchmarkId::new("side_by_side", files), &doc, |b, doc| {
            b.iter(|| doc.side_by_side(black_box(120)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_plain,
    bench_parse_colored,
    bench_document
);
criterion_main!(benches);
