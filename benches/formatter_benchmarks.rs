//! Benchmarks for the Markdown table formatter.
//!
//! Measures rendering and truncation cost on frames shaped like real
//! query results: a year of daily bars and a wide fundamentals table.

use ashare_gateway::domain::{Cell, DataFrame};
use ashare_gateway::formatting::{format_frame, FormatOptions};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Daily-bar frame: a date column plus `extra_cols` numeric columns.
fn daily_frame(rows: usize, extra_cols: usize) -> DataFrame {
    let mut columns = vec!["date".to_string()];
    for i in 0..extra_cols {
        columns.push(format!("field{}", i));
    }
    let mut frame = DataFrame::new(columns);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    for r in 0..rows {
        let mut row = vec![Cell::from(start + Duration::days(r as i64))];
        for c in 0..extra_cols {
            row.push(Cell::from(10.0 + (r * extra_cols + c) as f64 * 0.01));
        }
        frame.push_row(row);
    }
    frame
}

fn bench_year_of_daily_bars(c: &mut Criterion) {
    // 300 rows over ~300 calendar days lands in the dynamic-budget tier
    // that truncates rows, so this exercises the full policy.
    let frame = daily_frame(300, 24);
    let options = FormatOptions::default();
    c.bench_function("format_300x25_dynamic", |b| {
        b.iter(|| format_frame(black_box(&frame), black_box(&options)))
    });
}

fn bench_fixed_budget(c: &mut Criterion) {
    let frame = daily_frame(300, 24);
    let options = FormatOptions::fixed(20, 10);
    c.bench_function("format_300x25_fixed_20x10", |b| {
        b.iter(|| format_frame(black_box(&frame), black_box(&options)))
    });
}

fn bench_small_frame(c: &mut Criterion) {
    // Typical quarterly-report result: small, no truncation.
    let frame = daily_frame(4, 9);
    let options = FormatOptions::default();
    c.bench_function("format_4x10_untruncated", |b| {
        b.iter(|| format_frame(black_box(&frame), black_box(&options)))
    });
}

criterion_group!(
    benches,
    bench_year_of_daily_bars,
    bench_fixed_budget,
    bench_small_frame
);
criterion_main!(benches);
