//! Markdown rendering for tabular query results, with truncation.
//!
//! Large result sets are cut down to a row/column budget before rendering
//! so the output stays digestible for an LLM caller. Row selection always
//! keeps a head and a tail of the original sequence, so the start and end
//! of chronological data remain visible. When no explicit row cap is given
//! the budget is derived from the date span of the data (see
//! [`dynamic_row_budget`]).

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, error, warn};

use crate::domain::{Cell, DataFrame};

/// Default column cap when the caller does not override it.
pub const DEFAULT_MAX_COLS: usize = 20;

/// Hard ceiling on the dynamic row budget; roughly one year of daily bars
/// at ~250 trading days per year.
pub const MAX_RESULT_ROWS: usize = 250;

/// Floor applied whenever the row budget comes from a date-range estimate.
pub const MIN_RESULT_ROWS: usize = 50;

const TRADING_DAYS_PER_YEAR: i64 = 250;
const CALENDAR_DAYS_PER_YEAR: i64 = 365;

/// Returned for frames with zero rows.
pub const NO_DATA_SENTINEL: &str = "(No data available to display)";

/// Returned when the table cannot be rendered (e.g. a ragged frame).
pub const RENDER_ERROR_SENTINEL: &str = "Error: Could not format data into Markdown table.";

/// Display-size options for one formatting call.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Explicit row cap; when `None` the budget is computed dynamically.
    pub max_rows: Option<usize>,
    /// Column cap, always explicit.
    pub max_cols: usize,
    /// Query date range, used only as a row-budget hint when the frame has
    /// no usable date column.
    pub start_date: Option<String>,
    /// See `start_date`.
    pub end_date: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_rows: None,
            max_cols: DEFAULT_MAX_COLS,
            start_date: None,
            end_date: None,
        }
    }
}

impl FormatOptions {
    /// Options carrying the query's date range as a budget hint.
    pub fn with_date_range(start_date: Option<String>, end_date: Option<String>) -> Self {
        Self {
            start_date,
            end_date,
            ..Self::default()
        }
    }

    /// Fixed row and column caps, no dynamic budgeting.
    pub fn fixed(max_rows: usize, max_cols: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
            max_cols,
            ..Self::default()
        }
    }
}

/// Format a frame as a Markdown table, truncating to the configured
/// row/column budget and annotating the output when truncation occurred.
///
/// This is a pure read of the frame: it never mutates its input, never
/// fails on valid input, and degrades to sentinel strings on empty input
/// or internal render failure.
pub fn format_frame(frame: &DataFrame, opts: &FormatOptions) -> String {
    if frame.is_empty() {
        warn!("attempted to format an empty frame to Markdown");
        return NO_DATA_SENTINEL.to_string();
    }

    let original_rows = frame.n_rows();
    let original_cols = frame.n_cols();
    let max_rows = opts.max_rows.unwrap_or_else(|| {
        dynamic_row_budget(frame, opts.start_date.as_deref(), opts.end_date.as_deref())
    });
    let mut notes: Vec<String> = Vec::new();

    // Row selection: head + tail, no gap marker.
    let rows: Vec<&Vec<Cell>> = if original_rows > max_rows {
        let head = max_rows / 2;
        let tail = max_rows - head;
        notes.push(format!(
            "rows truncated to {} (from {})",
            max_rows, original_rows
        ));
        frame
            .rows()
            .iter()
            .take(head)
            .chain(frame.rows().iter().skip(original_rows - tail))
            .collect()
    } else {
        frame.rows().iter().collect()
    };

    // Column selection: first and last index ranges, deduplicated. A
    // BTreeSet keeps the surviving indices in original order.
    let col_indices: Vec<usize> = if original_cols > opts.max_cols {
        let head = opts.max_cols / 2;
        let tail = opts.max_cols - head;
        let keep: BTreeSet<usize> = (0..head)
            .chain(original_cols.saturating_sub(tail)..original_cols)
            .collect();
        notes.push(format!(
            "columns truncated to {} (from {})",
            keep.len(),
            original_cols
        ));
        keep.into_iter().collect()
    } else {
        (0..original_cols).collect()
    };

    let table = match render_table(frame, &rows, &col_indices) {
        Ok(table) => table,
        Err(err) => {
            error!("error converting frame to Markdown: {}", err);
            return RENDER_ERROR_SENTINEL.to_string();
        }
    };

    if notes.is_empty() {
        debug!("Markdown table generated without truncation");
        table
    } else {
        let notes = notes.join("; ");
        debug!("Markdown table generated with truncation notes: {}", notes);
        format!("Note: Data truncated ({}).\n\n{}", notes, table)
    }
}

/// Compute the row budget when the caller gave no explicit cap.
///
/// Tiers, each falling through to the next on failure:
/// 1. Date span of the frame's own date column, converted to an estimated
///    trading-day count, clamped to `[50, 250]` and then capped at the
///    frame's actual row count.
/// 2. The `start_date`/`end_date` hints, same estimate and clamp, no
///    actual-row cap.
/// 3. The 250-row ceiling.
fn dynamic_row_budget(frame: &DataFrame, start_date: Option<&str>, end_date: Option<&str>) -> usize {
    if let Some(span_days) = frame_date_span(frame) {
        let budget = estimate_trading_days(span_days)
            .clamp(MIN_RESULT_ROWS, MAX_RESULT_ROWS)
            .min(frame.n_rows());
        debug!(
            span_days,
            budget, "row budget derived from frame date column"
        );
        return budget;
    }

    if let (Some(start), Some(end)) = (start_date, end_date) {
        match (parse_iso_date(start), parse_iso_date(end)) {
            (Some(start), Some(end)) if end >= start => {
                let span_days = (end - start).num_days();
                let budget =
                    estimate_trading_days(span_days).clamp(MIN_RESULT_ROWS, MAX_RESULT_ROWS);
                debug!(span_days, budget, "row budget derived from query dates");
                return budget;
            }
            _ => {
                warn!(
                    start, end,
                    "unusable query date range, falling back to default row budget"
                );
            }
        }
    }

    MAX_RESULT_ROWS
}

/// Estimated trading days covered by a calendar-day span.
fn estimate_trading_days(span_days: i64) -> usize {
    (span_days * TRADING_DAYS_PER_YEAR / CALENDAR_DAYS_PER_YEAR + 1).max(1) as usize
}

/// Calendar-day span of the frame's date column, if it has one.
///
/// The candidate is the first column holding a date-typed cell or whose
/// first non-null value parses as `YYYY-MM-DD`. If any value in the
/// candidate then fails to parse the column is treated as unusable and the
/// caller falls through to the next estimation tier.
fn frame_date_span(frame: &DataFrame) -> Option<i64> {
    let candidate = (0..frame.n_cols()).find(|&idx| {
        frame
            .column_values(idx)
            .find(|cell| !matches!(cell, Cell::Null))
            .is_some_and(|cell| cell_date(cell).is_some())
    })?;

    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    for cell in frame.column_values(candidate) {
        if matches!(cell, Cell::Null) {
            continue;
        }
        let Some(date) = cell_date(cell) else {
            warn!(
                column = frame.columns().get(candidate).map(String::as_str),
                "unparseable value in presumed date column, skipping date-span estimate"
            );
            return None;
        };
        min = Some(min.map_or(date, |d| d.min(date)));
        max = Some(max.map_or(date, |d| d.max(date)));
    }

    Some((max? - min?).num_days())
}

fn cell_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_iso_date(text),
        _ => None,
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Render the selected rows/columns as a Markdown pipe table.
///
/// Fails (and only fails) when a selected row does not carry a value for
/// every selected column.
fn render_table(
    frame: &DataFrame,
    rows: &[&Vec<Cell>],
    col_indices: &[usize],
) -> Result<String, String> {
    let headers: Vec<&str> = col_indices
        .iter()
        .map(|&idx| frame.columns()[idx].as_str())
        .collect();

    let mut body: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let mut rendered = Vec::with_capacity(col_indices.len());
        for &idx in col_indices {
            let cell = row
                .get(idx)
                .ok_or_else(|| format!("row {} has no value for column {}", row_no, idx))?;
            rendered.push(cell.to_string());
        }
        body.push(rendered);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(3)).collect();
    for row in &body {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    render_row(&mut out, &headers, &widths);
    out.push('|');
    for width in &widths {
        out.push(' ');
        out.extend(std::iter::repeat('-').take(*width));
        out.push_str(" |");
    }
    out.push('\n');
    for row in &body {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        render_row(&mut out, &cells, &widths);
    }
    // No trailing newline after the last data row.
    out.truncate(out.trim_end_matches('\n').len());
    Ok(out)
}

fn render_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        out.extend(std::iter::repeat(' ').take(pad));
        out.push_str(" |");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    /// `rows` x `cols` frame of plain text cells, columns named c0..cN.
    fn text_frame(rows: usize, cols: usize) -> DataFrame {
        let mut frame = DataFrame::new((0..cols).map(|c| format!("c{}", c)).collect());
        for r in 0..rows {
            frame.push_row((0..cols).map(|c| Cell::from(format!("r{}c{}", r, c))).collect());
        }
        frame
    }

    /// Frame with a `date` column of `rows` textual dates evenly covering
    /// `span_days` calendar days, plus a `close` column.
    fn dated_frame(rows: usize, span_days: u64) -> DataFrame {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut frame = DataFrame::new(vec!["date", "close"]);
        for r in 0..rows {
            let offset = if rows > 1 {
                span_days * r as u64 / (rows as u64 - 1)
            } else {
                0
            };
            let date = start.checked_add_days(Days::new(offset)).unwrap();
            frame.push_row(vec![
                Cell::from(date.format("%Y-%m-%d").to_string()),
                Cell::from(10.0 + r as f64),
            ]);
        }
        frame
    }

    fn data_row_count(output: &str) -> usize {
        output
            .lines()
            .filter(|l| l.starts_with('|'))
            .count()
            .saturating_sub(2) // header + separator
    }

    #[test]
    fn empty_frame_returns_sentinel_regardless_of_options() {
        let frame = DataFrame::new(vec!["a", "b", "c"]);
        for opts in [
            FormatOptions::default(),
            FormatOptions::fixed(1, 1),
            FormatOptions::with_date_range(
                Some("2024-01-01".into()),
                Some("2024-12-31".into()),
            ),
        ] {
            assert_eq!(format_frame(&frame, &opts), NO_DATA_SENTINEL);
        }
    }

    #[test]
    fn small_frame_renders_without_notes() {
        let frame = text_frame(3, 2);
        let out = format_frame(&frame, &FormatOptions::fixed(50, 20));
        assert!(!out.contains("Note: Data truncated"));
        assert_eq!(data_row_count(&out), 3);
        let body_start = out.find("r0c0").unwrap();
        let mid = out.find("r1c0").unwrap();
        let last = out.find("r2c0").unwrap();
        assert!(body_start < mid && mid < last);
    }

    #[test]
    fn row_truncation_keeps_head_and_tail() {
        let frame = text_frame(10, 2);
        let out = format_frame(&frame, &FormatOptions::fixed(5, 20));
        assert!(out.contains("rows truncated to 5 (from 10)"));
        assert_eq!(data_row_count(&out), 5);
        // First floor(5/2)=2 rows, then last 3.
        for kept in ["r0c0", "r1c0", "r7c0", "r8c0", "r9c0"] {
            assert!(out.contains(kept), "missing {}", kept);
        }
        for dropped in ["r2c0", "r6c0"] {
            assert!(!out.contains(dropped), "unexpected {}", dropped);
        }
    }

    #[test]
    fn column_truncation_keeps_first_and_last_columns() {
        let frame = text_frame(8, 25);
        let out = format_frame(&frame, &FormatOptions::fixed(50, 20));
        assert!(!out.contains("rows truncated"));
        assert!(out.contains("columns truncated to 20 (from 25)"));
        // First floor(20/2)=10 columns and last 10, original order.
        let header = out.lines().find(|l| l.starts_with('|')).unwrap();
        let names: Vec<&str> = header
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let expected: Vec<String> = (0..10)
            .chain(15..25)
            .map(|c| format!("c{}", c))
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn no_column_note_at_or_under_cap() {
        let frame = text_frame(4, 20);
        let out = format_frame(&frame, &FormatOptions::fixed(50, 20));
        assert!(!out.contains("columns truncated"));
    }

    #[test]
    fn row_and_column_notes_joined_rows_first() {
        let frame = text_frame(30, 25);
        let out = format_frame(&frame, &FormatOptions::fixed(10, 20));
        assert!(out.starts_with(
            "Note: Data truncated (rows truncated to 10 (from 30); columns truncated to 20 (from 25)).\n\n"
        ));
    }

    #[test]
    fn year_long_date_span_budgets_250_rows() {
        // 365-day span: floor(365*250/365)+1 = 251, capped at 250.
        let frame = dated_frame(400, 365);
        let out = format_frame(&frame, &FormatOptions::default());
        assert!(out.contains("rows truncated to 250 (from 400)"));
        assert_eq!(data_row_count(&out), 250);
    }

    #[test]
    fn short_date_span_hits_the_50_row_floor() {
        // 36-day span: floor(36*250/365)+1 = 25, floored to 50.
        let frame = dated_frame(120, 36);
        let out = format_frame(&frame, &FormatOptions::default());
        assert!(out.contains("rows truncated to 50 (from 120)"));
        assert_eq!(data_row_count(&out), 50);
    }

    #[test]
    fn date_budget_is_capped_at_actual_row_count() {
        // A year-long span over only 100 rows must not trigger truncation.
        let frame = dated_frame(100, 365);
        let out = format_frame(&frame, &FormatOptions::default());
        assert!(!out.contains("Note: Data truncated"));
        assert_eq!(data_row_count(&out), 100);
    }

    #[test]
    fn three_hundred_daily_rows_budget_206() {
        // floor(300*250/365)+1 = 206, then min(300, 206) = 206.
        let frame = dated_frame(300, 300);
        let out = format_frame(&frame, &FormatOptions::default());
        assert!(out.contains("rows truncated to 206 (from 300)"));
        assert_eq!(data_row_count(&out), 206);
        assert!(!out.contains("columns truncated"));
    }

    #[test]
    fn query_date_hints_used_when_no_date_column() {
        let frame = text_frame(400, 3);
        let opts = FormatOptions::with_date_range(
            Some("2023-01-01".into()),
            Some("2024-01-01".into()),
        );
        let out = format_frame(&frame, &opts);
        assert!(out.contains("rows truncated to 250 (from 400)"));

        let opts = FormatOptions::with_date_range(
            Some("2024-01-01".into()),
            Some("2024-02-06".into()),
        );
        let out = format_frame(&frame, &opts);
        assert!(out.contains("rows truncated to 50 (from 400)"));
    }

    #[test]
    fn malformed_dates_fall_through_to_default_budget() {
        let mut frame = DataFrame::new(vec!["date", "v"]);
        frame.push_row(vec![Cell::from("2024-01-01"), Cell::from(1.0)]);
        frame.push_row(vec![Cell::from("not-a-date"), Cell::from(2.0)]);
        for _ in 0..300 {
            frame.push_row(vec![Cell::from("2024-06-01"), Cell::from(3.0)]);
        }
        // Date column unusable, no hints: budget is the 250 ceiling.
        let out = format_frame(&frame, &FormatOptions::default());
        assert!(out.contains("rows truncated to 250 (from 302)"));

        // Unparseable hints also fall through.
        let opts = FormatOptions::with_date_range(Some("soon".into()), Some("later".into()));
        let out = format_frame(&frame, &opts);
        assert!(out.contains("rows truncated to 250 (from 302)"));
    }

    #[test]
    fn ragged_frame_yields_render_error_sentinel() {
        let mut frame = DataFrame::new(vec!["a", "b", "c"]);
        frame.push_row(vec![Cell::from("x"), Cell::from("y"), Cell::from("z")]);
        frame.push_row(vec![Cell::from("short")]);
        assert_eq!(
            format_frame(&frame, &FormatOptions::default()),
            RENDER_ERROR_SENTINEL
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let frame = dated_frame(300, 300);
        let opts = FormatOptions::default();
        assert_eq!(format_frame(&frame, &opts), format_frame(&frame, &opts));
    }

    #[test]
    fn output_is_a_pipe_table_without_index_column() {
        let frame = text_frame(2, 2);
        let out = format_frame(&frame, &FormatOptions::default());
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap().trim(), "| c0   | c1   |");
        assert!(lines.next().unwrap().starts_with("| ---"));
        assert_eq!(out.lines().count(), 4);
    }
}
